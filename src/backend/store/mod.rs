//! Entity Store
//!
//! Persistence for boards, lists and cards behind one object-safe trait.
//! Two implementations ship with the server:
//!
//! - [`MemoryStore`] keeps everything in maps behind a single `RwLock`.
//!   Used when `DATABASE_URL` is not set and by most tests.
//! - [`SqliteStore`] persists through a sqlx SQLite pool with embedded
//!   migrations.
//!
//! # Contract
//!
//! - `find_*` by id return `Ok(None)` for unknown ids; every other
//!   operation reports an unknown id as [`StoreError::NotFound`].
//! - `delete_board` removes the board's lists and their cards,
//!   `delete_list` removes the list's cards, before acknowledging.
//! - `batch_update_lists` / `batch_update_cards` are all-or-nothing. Every
//!   id (and every `listId` of a card update) is checked before anything is
//!   written; a failing batch leaves the store unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::board::{Board, BoardPatch, Card, CardPatch, List, ListPatch};
use crate::shared::error::SharedError;
use crate::shared::reorder::PositionUpdate;

pub mod db;
pub mod memory;

pub use db::SqliteStore;
pub use memory::MemoryStore;

/// Errors raised by an entity store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error(transparent)]
    Validation(#[from] SharedError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be decoded into the model
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Store handle shared by all request handlers
pub type SharedStore = Arc<dyn EntityStore>;

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn create_board(&self, board: Board) -> StoreResult<Board>;
    async fn find_board(&self, id: Uuid) -> StoreResult<Option<Board>>;
    /// Boards owned by `owner_id`, newest first
    async fn find_boards_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Board>>;
    async fn update_board(&self, id: Uuid, patch: BoardPatch) -> StoreResult<Board>;
    async fn delete_board(&self, id: Uuid) -> StoreResult<()>;

    /// Fails with `NotFound` when the list's board does not exist
    async fn create_list(&self, list: List) -> StoreResult<List>;
    async fn find_list(&self, id: Uuid) -> StoreResult<Option<List>>;
    async fn find_lists_by_board(&self, board_id: Uuid) -> StoreResult<Vec<List>>;
    async fn update_list(&self, id: Uuid, patch: ListPatch) -> StoreResult<List>;
    async fn delete_list(&self, id: Uuid) -> StoreResult<()>;

    /// Fails with `NotFound` when the card's list does not exist
    async fn create_card(&self, card: Card) -> StoreResult<Card>;
    async fn find_card(&self, id: Uuid) -> StoreResult<Option<Card>>;
    async fn find_cards_by_list(&self, list_id: Uuid) -> StoreResult<Vec<Card>>;
    /// Cards of every list on the board
    async fn find_cards_by_board(&self, board_id: Uuid) -> StoreResult<Vec<Card>>;
    async fn update_card(&self, id: Uuid, patch: CardPatch) -> StoreResult<Card>;
    async fn delete_card(&self, id: Uuid) -> StoreResult<()>;

    async fn batch_update_lists(&self, items: &[PositionUpdate]) -> StoreResult<()>;
    /// An item with `list_id` also moves the card to that list
    async fn batch_update_cards(&self, items: &[PositionUpdate]) -> StoreResult<()>;
}

/// Reject a batch that names the same entity twice
pub(crate) fn check_unique_ids(items: &[PositionUpdate]) -> StoreResult<()> {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id) {
            return Err(SharedError::validation(
                "items",
                format!("{} appears more than once in the batch", item.id),
            )
            .into());
        }
    }
    Ok(())
}
