//! Backend Error Module
//!
//! Error types returned by HTTP handlers and their conversion into HTTP
//! responses.
//!
//! - **`types`** - `BackendError` and its status mapping
//! - **`conversion`** - `IntoResponse` implementation

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;

pub type ApiResult<T> = Result<T, BackendError>;
