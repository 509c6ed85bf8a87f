//! Shared Error Types
//!
//! Errors that mean the same thing on the server and in the client:
//! a request that fails validation, or an id that does not resolve.
//!
//! # Error Categories
//!
//! - `SerializationError` - a JSON body could not be decoded (the client
//!   reports malformed success responses this way)
//! - `ValidationError` - a required field is missing or malformed
//! - `NotFound` - an entity id does not resolve
//!
//! # Usage
//!
//! ```rust
//! use kanboard::shared::error::SharedError;
//!
//! let error = SharedError::validation("boardId", "boardId is required");
//! assert!(error.to_string().contains("boardId"));
//! ```
use thiserror::Error;
use uuid::Uuid;

/// Shared error types that can occur in both client and server
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Entity lookup failed
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind (`board`, `list`, `card`)
        entity: &'static str,
        id: Uuid,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
