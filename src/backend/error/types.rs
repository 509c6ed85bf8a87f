/**
 * Backend Error Types
 *
 * Errors returned by HTTP handlers. Each variant maps onto one HTTP status
 * code and is rendered as JSON by the `IntoResponse` impl in `conversion`.
 *
 * # Status Mapping
 *
 * - Validation failures (bad body, missing query parameter) - 400
 * - Missing or malformed caller identity - 401
 * - Unknown entity id - 404
 * - Store failures (database, corrupt rows) - 500
 */

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use axum::http::StatusCode;
/// use kanboard::backend::error::BackendError;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// No usable caller identity on the request
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Error from the shared module (validation, lookup)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Entity store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Missing or malformed request field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SharedError(SharedError::validation(field, message))
    }

    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::SharedError(SharedError::not_found(entity, id))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::SharedError(err) => shared_status(err),
            Self::Store(err) => match err {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::Validation(shared) => shared_status(shared),
                StoreError::Database(_) | StoreError::Migration(_) | StoreError::Corrupt(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Get the error message
    ///
    /// Store internals are not exposed to callers.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Unauthorized { message } => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::Store(err) => match err {
                StoreError::NotFound { .. } | StoreError::Validation(_) => err.to_string(),
                _ => "Internal server error".to_string(),
            },
        }
    }
}

fn shared_status(err: &SharedError) -> StatusCode {
    match err {
        SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
        SharedError::NotFound { .. } => StatusCode::NOT_FOUND,
        SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
