//! Board state container
//!
//! The client's copy of one board: lists in order and each list's cards in
//! order. The reorder engine never sees this type directly; [`BoardState::plan`]
//! hands it the sequences a move touches and [`BoardState::apply`] writes the
//! result back.

use std::collections::HashMap;

use uuid::Uuid;

use crate::shared::aggregate::BoardAggregate;
use crate::shared::board::{Board, Card, List};
use crate::shared::position::{append_position, sort_by_position};
use crate::shared::reorder::{
    reorder_cards, reorder_lists, CardReorder, ListReorder, Move, MoveKind, ReorderBatch,
    ReorderError,
};

/// A computed move, not yet applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderPlan {
    Lists(ListReorder),
    Cards(CardReorder),
}

impl ReorderPlan {
    pub fn kind(&self) -> MoveKind {
        match self {
            ReorderPlan::Lists(_) => MoveKind::List,
            ReorderPlan::Cards(_) => MoveKind::Card,
        }
    }

    pub fn batch(&self) -> &ReorderBatch {
        match self {
            ReorderPlan::Lists(result) => &result.batch,
            ReorderPlan::Cards(result) => &result.batch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    board: Board,
    lists: Vec<List>,
    cards: HashMap<Uuid, Vec<Card>>,
}

impl BoardState {
    pub fn from_aggregate(aggregate: BoardAggregate) -> Self {
        let BoardAggregate {
            board,
            lists,
            cards,
        } = aggregate;
        let mut grouped: HashMap<Uuid, Vec<Card>> =
            lists.iter().map(|list| (list.id, Vec::new())).collect();
        for card in cards {
            if let Some(siblings) = grouped.get_mut(&card.list_id) {
                siblings.push(card);
            }
        }
        for siblings in grouped.values_mut() {
            sort_by_position(siblings);
        }
        let mut lists = lists;
        sort_by_position(&mut lists);
        Self {
            board,
            lists,
            cards: grouped,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_id(&self) -> Uuid {
        self.board.id
    }

    /// Lists in display order
    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn list(&self, list_id: Uuid) -> Option<&List> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    /// Cards of one list in display order; empty for an unknown list
    pub fn cards_in(&self, list_id: Uuid) -> &[Card] {
        self.cards.get(&list_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn card(&self, card_id: Uuid) -> Option<&Card> {
        self.cards
            .values()
            .flat_map(|cards| cards.iter())
            .find(|card| card.id == card_id)
    }

    pub fn card_count(&self) -> usize {
        self.cards.values().map(Vec::len).sum()
    }

    /// Position for a list appended to the board
    pub fn next_list_position(&self) -> u32 {
        append_position(&self.lists)
    }

    /// Position for a card appended to `list_id`
    pub fn next_card_position(&self, list_id: Uuid) -> u32 {
        append_position(self.cards_in(list_id))
    }

    /// Compute a move against the current state without changing it
    pub fn plan(&self, mv: &Move) -> Result<ReorderPlan, ReorderError> {
        match mv.kind {
            MoveKind::List => {
                if mv.source.parent_id != self.board.id {
                    return Err(ReorderError::UnknownParent {
                        parent: mv.source.parent_id,
                    });
                }
                reorder_lists(&self.lists, mv).map(ReorderPlan::Lists)
            }
            MoveKind::Card => {
                for parent in [mv.source.parent_id, mv.destination.parent_id] {
                    if !self.cards.contains_key(&parent) {
                        return Err(ReorderError::UnknownParent { parent });
                    }
                }
                reorder_cards(
                    mv,
                    self.cards_in(mv.source.parent_id),
                    self.cards_in(mv.destination.parent_id),
                )
                .map(ReorderPlan::Cards)
            }
        }
    }

    pub fn apply(&mut self, plan: ReorderPlan) {
        match plan {
            ReorderPlan::Lists(result) => self.lists = result.lists,
            ReorderPlan::Cards(result) => {
                let CardReorder {
                    source,
                    destination,
                    ..
                } = result;
                for sequence in std::iter::once(source).chain(destination) {
                    self.cards.insert(sequence.list_id, sequence.cards);
                }
            }
        }
    }

    pub fn insert_list(&mut self, list: List) {
        self.cards.entry(list.id).or_default();
        self.lists.retain(|existing| existing.id != list.id);
        self.lists.push(list);
        sort_by_position(&mut self.lists);
    }

    /// Replace a list's fields, keeping its cards
    pub fn replace_list(&mut self, list: List) {
        self.insert_list(list);
    }

    /// Remove a list and the cards it holds
    pub fn remove_list(&mut self, list_id: Uuid) -> Option<List> {
        let index = self.lists.iter().position(|list| list.id == list_id)?;
        self.cards.remove(&list_id);
        Some(self.lists.remove(index))
    }

    /// Insert or replace a card, moving it if its list changed
    ///
    /// A card for a list this board does not show is ignored.
    pub fn insert_card(&mut self, card: Card) {
        if !self.cards.contains_key(&card.list_id) {
            tracing::warn!(card_id = %card.id, list_id = %card.list_id, "Card for unknown list ignored");
            return;
        }
        self.remove_card(card.id);
        if let Some(siblings) = self.cards.get_mut(&card.list_id) {
            siblings.push(card);
            sort_by_position(siblings);
        }
    }

    pub fn remove_card(&mut self, card_id: Uuid) -> Option<Card> {
        self.cards.values_mut().find_map(|siblings| {
            let index = siblings.iter().position(|card| card.id == card_id)?;
            Some(siblings.remove(index))
        })
    }

    /// Flatten back into an aggregate
    pub fn to_aggregate(&self) -> BoardAggregate {
        let cards = self
            .lists
            .iter()
            .flat_map(|list| self.cards_in(list.id).iter().cloned())
            .collect();
        BoardAggregate::assemble(self.board.clone(), self.lists.clone(), cards)
    }
}
