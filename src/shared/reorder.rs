//! Reorder Engine
//!
//! Turns one drag-and-drop gesture into the new sibling order and the batch
//! of position updates that persists it. Everything here is pure: inputs are
//! borrowed, outputs are fresh vectors, and nothing depends on the clock or
//! on randomness.
//!
//! # Moves
//!
//! - **List move**: one sequence (all lists of a board). Splice, renumber,
//!   persist the lists whose position changed.
//! - **Card move, same list**: one sequence. Splice, renumber, persist the
//!   whole list.
//! - **Card move, cross list**: two sequences. The card leaves the source,
//!   takes the destination's `list_id` and is inserted there; both are
//!   renumbered from 0 and both are persisted. Cards of other lists never
//!   appear in the batch.
//!
//! Any inconsistency between the gesture and the sequences (entity missing,
//! index out of range, sibling with a foreign parent) rejects the whole move
//! and produces nothing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::shared::board::{Card, List, Positioned};
use crate::shared::position::renumber;

/// What is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    List,
    Card,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveKind::List => write!(f, "list"),
            MoveKind::Card => write!(f, "card"),
        }
    }
}

/// A slot inside a parent: the board for lists, the list for cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropLocation {
    pub parent_id: Uuid,
    pub index: usize,
}

impl DropLocation {
    pub fn new(parent_id: Uuid, index: usize) -> Self {
        Self { parent_id, index }
    }
}

/// Outcome of a drag gesture as reported by the UI
///
/// `destination` is `None` when the entity was dropped outside any valid
/// target; such a drop never reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragResult {
    pub kind: MoveKind,
    pub entity_id: Uuid,
    pub source: DropLocation,
    #[serde(default)]
    pub destination: Option<DropLocation>,
}

impl DragResult {
    /// The move to compute, or `None` for a drop outside any target
    pub fn into_move(self) -> Option<Move> {
        let destination = self.destination?;
        Some(Move {
            kind: self.kind,
            entity_id: self.entity_id,
            source: self.source,
            destination,
        })
    }
}

/// A drop with a valid destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub kind: MoveKind,
    pub entity_id: Uuid,
    pub source: DropLocation,
    pub destination: DropLocation,
}

impl Move {
    pub fn list(list_id: Uuid, board_id: Uuid, from: usize, to: usize) -> Self {
        Self {
            kind: MoveKind::List,
            entity_id: list_id,
            source: DropLocation::new(board_id, from),
            destination: DropLocation::new(board_id, to),
        }
    }

    pub fn card(card_id: Uuid, source: DropLocation, destination: DropLocation) -> Self {
        Self {
            kind: MoveKind::Card,
            entity_id: card_id,
            source,
            destination,
        }
    }

    pub fn is_same_parent(&self) -> bool {
        self.source.parent_id == self.destination.parent_id
    }

    /// Dropped back onto the slot it came from
    pub fn is_noop(&self) -> bool {
        self.is_same_parent() && self.source.index == self.destination.index
    }
}

/// One entry of a reorder batch
///
/// `list_id` is set for card updates so a cross-list move carries the new
/// owner alongside the new position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub id: Uuid,
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<Uuid>,
}

/// Body of the reorder endpoints: `{ "items": [...] }`
///
/// Each entity appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderBatch {
    pub items: Vec<PositionUpdate>,
}

impl ReorderBatch {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&PositionUpdate> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }
}

/// Rejection of an inconsistent move
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("expected a {expected} move, got a {found} move")]
    KindMismatch { expected: MoveKind, found: MoveKind },

    #[error("{kind} {id} is not in the source sequence")]
    MissingEntity { kind: MoveKind, id: Uuid },

    #[error("source index {index} is out of bounds for {len} entries")]
    SourceIndexOutOfBounds { index: usize, len: usize },

    #[error("destination index {index} is out of bounds (max {max})")]
    DestinationIndexOutOfBounds { index: usize, max: usize },

    #[error("{kind} at index {index} is {found}, not {expected}")]
    EntityIndexMismatch {
        kind: MoveKind,
        index: usize,
        expected: Uuid,
        found: Uuid,
    },

    #[error("{kind} {id} does not belong to {parent}")]
    ParentMismatch { kind: MoveKind, id: Uuid, parent: Uuid },

    #[error("{kind} {id} is already in the destination sequence")]
    DuplicateEntity { kind: MoveKind, id: Uuid },

    #[error("unknown parent {parent}")]
    UnknownParent { parent: Uuid },
}

/// Result of a list move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListReorder {
    /// Every list of the board in its new order, positions `0..n`
    pub lists: Vec<List>,
    pub batch: ReorderBatch,
}

/// A list's cards in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSequence {
    pub list_id: Uuid,
    pub cards: Vec<Card>,
}

/// Result of a card move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardReorder {
    pub source: CardSequence,
    /// `None` for a move within one list
    pub destination: Option<CardSequence>,
    pub batch: ReorderBatch,
}

impl CardReorder {
    pub fn sequences(&self) -> impl Iterator<Item = &CardSequence> {
        std::iter::once(&self.source).chain(self.destination.as_ref())
    }
}

fn expect_kind(mv: &Move, expected: MoveKind) -> Result<(), ReorderError> {
    if mv.kind != expected {
        return Err(ReorderError::KindMismatch {
            expected,
            found: mv.kind,
        });
    }
    Ok(())
}

fn check_parent<T: Positioned>(
    kind: MoveKind,
    sequence: &[T],
    parent: Uuid,
) -> Result<(), ReorderError> {
    match sequence.iter().find(|entity| entity.parent_id() != parent) {
        Some(stray) => Err(ReorderError::ParentMismatch {
            kind,
            id: stray.id(),
            parent,
        }),
        None => Ok(()),
    }
}

/// Copy `sequence` without the entity at `index`, which must be `entity_id`
fn take_moved<T: Positioned + Clone>(
    kind: MoveKind,
    sequence: &[T],
    index: usize,
    entity_id: Uuid,
) -> Result<(Vec<T>, T), ReorderError> {
    if !sequence.iter().any(|entity| entity.id() == entity_id) {
        return Err(ReorderError::MissingEntity { kind, id: entity_id });
    }
    let found = sequence
        .get(index)
        .ok_or(ReorderError::SourceIndexOutOfBounds {
            index,
            len: sequence.len(),
        })?
        .id();
    if found != entity_id {
        return Err(ReorderError::EntityIndexMismatch {
            kind,
            index,
            expected: entity_id,
            found,
        });
    }

    let mut remaining = sequence.to_vec();
    let moved = remaining.remove(index);
    Ok((remaining, moved))
}

fn insert_at<T>(sequence: &mut Vec<T>, index: usize, entity: T) -> Result<(), ReorderError> {
    if index > sequence.len() {
        return Err(ReorderError::DestinationIndexOutOfBounds {
            index,
            max: sequence.len(),
        });
    }
    sequence.insert(index, entity);
    Ok(())
}

fn card_updates(cards: &[Card]) -> impl Iterator<Item = PositionUpdate> + '_ {
    cards.iter().map(|card| PositionUpdate {
        id: card.id,
        position: card.position,
        list_id: Some(card.list_id),
    })
}

/// Move one list within its board
///
/// `lists` must be every list of the board, sorted by position. The batch
/// holds the lists whose position differs from the one they came in with.
pub fn reorder_lists(lists: &[List], mv: &Move) -> Result<ListReorder, ReorderError> {
    expect_kind(mv, MoveKind::List)?;
    let board_id = mv.source.parent_id;
    if mv.destination.parent_id != board_id {
        return Err(ReorderError::ParentMismatch {
            kind: MoveKind::List,
            id: mv.entity_id,
            parent: mv.destination.parent_id,
        });
    }
    check_parent(MoveKind::List, lists, board_id)?;

    let (mut sequence, moved) = take_moved(MoveKind::List, lists, mv.source.index, mv.entity_id)?;
    insert_at(&mut sequence, mv.destination.index, moved)?;
    let reordered = renumber(sequence);

    let items = reordered
        .iter()
        .filter(|list| {
            lists
                .iter()
                .find(|before| before.id == list.id)
                .map_or(true, |before| before.position != list.position)
        })
        .map(|list| PositionUpdate {
            id: list.id,
            position: list.position,
            list_id: None,
        })
        .collect();

    Ok(ListReorder {
        lists: reordered,
        batch: ReorderBatch { items },
    })
}

/// Move one card within a list or across lists
///
/// `source` and `destination` are the cards of the source and destination
/// lists, each sorted by position. For a move within one list only `source`
/// is read. The batch covers every card of the affected list(s).
pub fn reorder_cards(
    mv: &Move,
    source: &[Card],
    destination: &[Card],
) -> Result<CardReorder, ReorderError> {
    expect_kind(mv, MoveKind::Card)?;
    let source_list = mv.source.parent_id;
    let destination_list = mv.destination.parent_id;
    check_parent(MoveKind::Card, source, source_list)?;

    if mv.is_same_parent() {
        let (mut sequence, moved) =
            take_moved(MoveKind::Card, source, mv.source.index, mv.entity_id)?;
        insert_at(&mut sequence, mv.destination.index, moved)?;
        let cards = renumber(sequence);
        let batch = ReorderBatch {
            items: card_updates(&cards).collect(),
        };
        return Ok(CardReorder {
            source: CardSequence {
                list_id: source_list,
                cards,
            },
            destination: None,
            batch,
        });
    }

    check_parent(MoveKind::Card, destination, destination_list)?;
    if destination.iter().any(|card| card.id == mv.entity_id) {
        return Err(ReorderError::DuplicateEntity {
            kind: MoveKind::Card,
            id: mv.entity_id,
        });
    }

    let (remaining, mut moved) =
        take_moved(MoveKind::Card, source, mv.source.index, mv.entity_id)?;
    moved.list_id = destination_list;
    let mut receiving = destination.to_vec();
    insert_at(&mut receiving, mv.destination.index, moved)?;

    let source_cards = renumber(remaining);
    let destination_cards = renumber(receiving);
    let batch = ReorderBatch {
        items: card_updates(&source_cards)
            .chain(card_updates(&destination_cards))
            .collect(),
    };

    Ok(CardReorder {
        source: CardSequence {
            list_id: source_list,
            cards: source_cards,
        },
        destination: Some(CardSequence {
            list_id: destination_list,
            cards: destination_cards,
        }),
        batch,
    })
}
