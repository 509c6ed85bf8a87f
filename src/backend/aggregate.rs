//! Board Aggregate Fetcher (server side)

use uuid::Uuid;

use crate::backend::store::{EntityStore, StoreError, StoreResult};
use crate::shared::aggregate::BoardAggregate;

/// Read a board with its lists and cards
///
/// The three queries run concurrently; the first failure fails the whole
/// read and nothing partial is returned.
pub async fn load_board(store: &dyn EntityStore, board_id: Uuid) -> StoreResult<BoardAggregate> {
    let (board, lists, cards) = tokio::try_join!(
        store.find_board(board_id),
        store.find_lists_by_board(board_id),
        store.find_cards_by_board(board_id),
    )?;
    let board = board.ok_or(StoreError::not_found("board", board_id))?;
    tracing::debug!(
        board_id = %board_id,
        lists = lists.len(),
        cards = cards.len(),
        "Loaded board aggregate"
    );
    Ok(BoardAggregate::assemble(board, lists, cards))
}
