//! Board Aggregate
//!
//! A board with its lists and cards, read as one value. Both the server-side
//! fetcher and the client assemble the three query results through
//! [`BoardAggregate::assemble`], which owns the sorting rule so the stores
//! are free to return rows in any order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::board::{Board, Card, List};
use crate::shared::position::sort_by_position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardAggregate {
    pub board: Board,
    /// Sorted by position
    pub lists: Vec<List>,
    /// Sorted by position
    pub cards: Vec<Card>,
}

impl BoardAggregate {
    /// Compose the three reads into one consistent value
    ///
    /// Lists from another board and cards whose list is not part of the
    /// board are dropped.
    pub fn assemble(board: Board, lists: Vec<List>, cards: Vec<Card>) -> Self {
        let mut lists: Vec<List> = lists
            .into_iter()
            .filter(|list| list.board_id == board.id)
            .collect();
        sort_by_position(&mut lists);

        let list_ids: HashSet<Uuid> = lists.iter().map(|list| list.id).collect();
        let total = cards.len();
        let mut cards: Vec<Card> = cards
            .into_iter()
            .filter(|card| list_ids.contains(&card.list_id))
            .collect();
        if cards.len() != total {
            tracing::warn!(
                board_id = %board.id,
                dropped = total - cards.len(),
                "Dropped cards that belong to no list of the board"
            );
        }
        sort_by_position(&mut cards);

        Self {
            board,
            lists,
            cards,
        }
    }

    /// Cards of one list, in order
    pub fn cards_in(&self, list_id: Uuid) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| card.list_id == list_id)
            .collect()
    }
}
