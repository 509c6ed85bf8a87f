//! Client Sync Layer errors

use thiserror::Error;

use crate::shared::config::ConfigError;
use crate::shared::error::SharedError;
use crate::shared::reorder::ReorderError;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The drop does not match local state; nothing was applied
    #[error("reorder rejected: {0}")]
    Reorder(#[from] ReorderError),

    /// The server answered with a non-success status
    #[error("request failed: {status} - {message}")]
    Persistence { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body is not the expected JSON
    #[error("unexpected response body: {0}")]
    Decode(#[from] SharedError),

    /// The server does not know the referenced entity
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl SyncError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
