//! Shared Module
//!
//! Types and pure logic used by both the server and the client: the
//! board/list/card records, the position rules, the reorder engine and the
//! aggregate that the UI renders from.
//!
//! Nothing in here performs I/O.

/// Board, list and card records plus their create/patch bodies
pub mod board;

/// Position assignment and renumbering
pub mod position;

/// Drag-and-drop reorder computation
pub mod reorder;

/// Board aggregate assembly
pub mod aggregate;

/// Shared error types
pub mod error;

/// Client configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use aggregate::BoardAggregate;
pub use board::{Board, BoardPatch, Card, CardPatch, List, ListPatch, NewBoard, NewCard, NewList};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use reorder::{
    DragResult, DropLocation, Move, MoveKind, PositionUpdate, ReorderBatch, ReorderError,
};
