//! Board, List and Card records
//!
//! These are the persisted entities. Boards own lists through `board_id`,
//! lists own cards through `list_id`; neither is embedded in its parent.
//!
//! The patch types double as the JSON bodies of the update endpoints and as
//! the `partialFields` argument of the entity store, so the rules for what
//! an update may change live in one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// A kanban board, owned by the user that created it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub title: String,
    /// Opaque identifier issued by the external identity provider
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// An ordered column of cards on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: Uuid,
    pub title: String,
    /// Immutable once created
    pub board_id: Uuid,
    pub position: u32,
}

/// A card inside a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub list_id: Uuid,
    pub position: u32,
}

/// Entities that are ordered among their siblings
pub trait Positioned {
    fn id(&self) -> Uuid;
    fn parent_id(&self) -> Uuid;
    fn position(&self) -> u32;
    fn set_position(&mut self, position: u32);
}

impl Positioned for List {
    fn id(&self) -> Uuid {
        self.id
    }

    fn parent_id(&self) -> Uuid {
        self.board_id
    }

    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

impl Positioned for Card {
    fn id(&self) -> Uuid {
        self.id
    }

    fn parent_id(&self) -> Uuid {
        self.list_id
    }

    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

impl Board {
    pub fn new(title: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            owner_id: owner_id.into(),
            created_at: Utc::now(),
        }
    }
}

impl List {
    pub fn new(title: impl Into<String>, board_id: Uuid, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            board_id,
            position,
        }
    }
}

impl Card {
    pub fn new(title: impl Into<String>, list_id: Uuid, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            list_id,
            position,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn require_title(title: &str) -> Result<(), SharedError> {
    if title.trim().is_empty() {
        return Err(SharedError::validation("title", "title must not be empty"));
    }
    Ok(())
}

/// Body of `POST /api/boards`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBoard {
    pub title: String,
}

impl NewBoard {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_title(&self.title)
    }
}

/// Body of `POST /api/lists`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewList {
    pub title: String,
    pub board_id: Uuid,
    /// Appended after the existing lists when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl NewList {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_title(&self.title)
    }
}

/// Body of `POST /api/cards`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub list_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl NewCard {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_title(&self.title)
    }
}

/// Partial update of a board. Only the title is mutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl BoardPatch {
    pub fn apply(&self, board: &mut Board) -> Result<(), SharedError> {
        if let Some(title) = &self.title {
            require_title(title)?;
            board.title = title.clone();
        }
        Ok(())
    }
}

/// Partial update of a list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Accepted only when it matches the current board; lists never move
    /// between boards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl ListPatch {
    pub fn apply(&self, list: &mut List) -> Result<(), SharedError> {
        if let Some(board_id) = self.board_id {
            if board_id != list.board_id {
                return Err(SharedError::validation(
                    "boardId",
                    "a list cannot be moved to another board",
                ));
            }
        }
        if let Some(title) = &self.title {
            require_title(title)?;
            list.title = title.clone();
        }
        if let Some(position) = self.position {
            list.position = position;
        }
        Ok(())
    }
}

/// Partial update of a card
///
/// An empty `description` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl CardPatch {
    pub fn apply(&self, card: &mut Card) -> Result<(), SharedError> {
        if let Some(title) = &self.title {
            require_title(title)?;
            card.title = title.clone();
        }
        if let Some(description) = &self.description {
            card.description = if description.is_empty() {
                None
            } else {
                Some(description.clone())
            };
        }
        if let Some(list_id) = self.list_id {
            card.list_id = list_id;
        }
        if let Some(position) = self.position {
            card.position = position;
        }
        Ok(())
    }
}

/// Generic acknowledgement body for deletes and batch updates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
