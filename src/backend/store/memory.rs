//! In-memory entity store
//!
//! All three tables sit behind one `RwLock`, so a batch validated and
//! applied under a single write guard is atomic for every reader.
//! Lists and cards are stamped with an insertion sequence, so siblings
//! sharing a position read back in creation order, as they do from SQLite.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{check_unique_ids, EntityStore, StoreError, StoreResult};
use crate::shared::board::{Board, BoardPatch, Card, CardPatch, List, ListPatch, Positioned};
use crate::shared::reorder::PositionUpdate;

#[derive(Debug, Default)]
struct Tables {
    boards: HashMap<Uuid, Board>,
    lists: HashMap<Uuid, List>,
    cards: HashMap<Uuid, Card>,
    inserted: HashMap<Uuid, u64>,
    next_seq: u64,
}

impl Tables {
    fn stamp(&mut self, id: Uuid) {
        self.next_seq += 1;
        self.inserted.insert(id, self.next_seq);
    }

    /// Sort by position, then by insertion sequence
    fn sort_siblings<T: Positioned>(&self, entities: &mut [T]) {
        entities.sort_by_key(|entity| {
            let seq = self.inserted.get(&entity.id()).copied().unwrap_or(u64::MAX);
            (entity.position(), seq)
        });
    }

    fn remove_card(&mut self, card_id: Uuid) -> Option<Card> {
        self.inserted.remove(&card_id);
        self.cards.remove(&card_id)
    }

    fn remove_list_cascade(&mut self, list_id: Uuid) {
        self.lists.remove(&list_id);
        self.inserted.remove(&list_id);
        let card_ids: Vec<Uuid> = self
            .cards
            .values()
            .filter(|card| card.list_id == list_id)
            .map(|card| card.id)
            .collect();
        for card_id in card_ids {
            self.remove_card(card_id);
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_board(&self, board: Board) -> StoreResult<Board> {
        let mut tables = self.tables.write().await;
        tables.boards.insert(board.id, board.clone());
        Ok(board)
    }

    async fn find_board(&self, id: Uuid) -> StoreResult<Option<Board>> {
        Ok(self.tables.read().await.boards.get(&id).cloned())
    }

    async fn find_boards_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Board>> {
        let tables = self.tables.read().await;
        let mut boards: Vec<Board> = tables
            .boards
            .values()
            .filter(|board| board.owner_id == owner_id)
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    async fn update_board(&self, id: Uuid, patch: BoardPatch) -> StoreResult<Board> {
        let mut tables = self.tables.write().await;
        let board = tables
            .boards
            .get_mut(&id)
            .ok_or(StoreError::not_found("board", id))?;
        let mut updated = board.clone();
        patch.apply(&mut updated)?;
        *board = updated.clone();
        Ok(updated)
    }

    async fn delete_board(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.boards.remove(&id).is_none() {
            return Err(StoreError::not_found("board", id));
        }
        let list_ids: Vec<Uuid> = tables
            .lists
            .values()
            .filter(|list| list.board_id == id)
            .map(|list| list.id)
            .collect();
        for list_id in list_ids {
            tables.remove_list_cascade(list_id);
        }
        Ok(())
    }

    async fn create_list(&self, list: List) -> StoreResult<List> {
        let mut tables = self.tables.write().await;
        if !tables.boards.contains_key(&list.board_id) {
            return Err(StoreError::not_found("board", list.board_id));
        }
        tables.stamp(list.id);
        tables.lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn find_list(&self, id: Uuid) -> StoreResult<Option<List>> {
        Ok(self.tables.read().await.lists.get(&id).cloned())
    }

    async fn find_lists_by_board(&self, board_id: Uuid) -> StoreResult<Vec<List>> {
        let tables = self.tables.read().await;
        let mut lists: Vec<List> = tables
            .lists
            .values()
            .filter(|list| list.board_id == board_id)
            .cloned()
            .collect();
        tables.sort_siblings(&mut lists);
        Ok(lists)
    }

    async fn update_list(&self, id: Uuid, patch: ListPatch) -> StoreResult<List> {
        let mut tables = self.tables.write().await;
        let list = tables
            .lists
            .get_mut(&id)
            .ok_or(StoreError::not_found("list", id))?;
        let mut updated = list.clone();
        patch.apply(&mut updated)?;
        *list = updated.clone();
        Ok(updated)
    }

    async fn delete_list(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.lists.contains_key(&id) {
            return Err(StoreError::not_found("list", id));
        }
        tables.remove_list_cascade(id);
        Ok(())
    }

    async fn create_card(&self, card: Card) -> StoreResult<Card> {
        let mut tables = self.tables.write().await;
        if !tables.lists.contains_key(&card.list_id) {
            return Err(StoreError::not_found("list", card.list_id));
        }
        tables.stamp(card.id);
        tables.cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn find_card(&self, id: Uuid) -> StoreResult<Option<Card>> {
        Ok(self.tables.read().await.cards.get(&id).cloned())
    }

    async fn find_cards_by_list(&self, list_id: Uuid) -> StoreResult<Vec<Card>> {
        let tables = self.tables.read().await;
        let mut cards: Vec<Card> = tables
            .cards
            .values()
            .filter(|card| card.list_id == list_id)
            .cloned()
            .collect();
        tables.sort_siblings(&mut cards);
        Ok(cards)
    }

    async fn find_cards_by_board(&self, board_id: Uuid) -> StoreResult<Vec<Card>> {
        let tables = self.tables.read().await;
        let mut cards: Vec<Card> = tables
            .cards
            .values()
            .filter(|card| {
                tables
                    .lists
                    .get(&card.list_id)
                    .is_some_and(|list| list.board_id == board_id)
            })
            .cloned()
            .collect();
        tables.sort_siblings(&mut cards);
        Ok(cards)
    }

    async fn update_card(&self, id: Uuid, patch: CardPatch) -> StoreResult<Card> {
        let mut tables = self.tables.write().await;
        if let Some(list_id) = patch.list_id {
            if !tables.lists.contains_key(&list_id) {
                return Err(StoreError::not_found("list", list_id));
            }
        }
        let card = tables
            .cards
            .get_mut(&id)
            .ok_or(StoreError::not_found("card", id))?;
        let mut updated = card.clone();
        patch.apply(&mut updated)?;
        *card = updated.clone();
        Ok(updated)
    }

    async fn delete_card(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.remove_card(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found("card", id)),
        }
    }

    async fn batch_update_lists(&self, items: &[PositionUpdate]) -> StoreResult<()> {
        check_unique_ids(items)?;
        let mut tables = self.tables.write().await;
        if let Some(missing) = items.iter().find(|item| !tables.lists.contains_key(&item.id)) {
            return Err(StoreError::not_found("list", missing.id));
        }
        for item in items {
            if let Some(list) = tables.lists.get_mut(&item.id) {
                list.position = item.position;
            }
        }
        Ok(())
    }

    async fn batch_update_cards(&self, items: &[PositionUpdate]) -> StoreResult<()> {
        check_unique_ids(items)?;
        let mut tables = self.tables.write().await;
        for item in items {
            if !tables.cards.contains_key(&item.id) {
                return Err(StoreError::not_found("card", item.id));
            }
            if let Some(list_id) = item.list_id {
                if !tables.lists.contains_key(&list_id) {
                    return Err(StoreError::not_found("list", list_id));
                }
            }
        }
        for item in items {
            if let Some(card) = tables.cards.get_mut(&item.id) {
                card.position = item.position;
                if let Some(list_id) = item.list_id {
                    card.list_id = list_id;
                }
            }
        }
        Ok(())
    }
}
