//! Backend Module
//!
//! The HTTP server: an axum router over an [`EntityStore`]. Only compiled
//! with the `ssr` feature.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── server/      - configuration, state, app creation
//! ├── routes/      - route table, tracing and CORS layers
//! ├── handlers/    - board, list and card endpoints
//! ├── middleware/  - caller identity extraction
//! ├── store/       - EntityStore trait, in-memory and SQLite stores
//! ├── aggregate.rs - Board Aggregate Fetcher
//! └── error/       - BackendError and its HTTP rendering
//! ```
//!
//! [`EntityStore`]: store::EntityStore

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Request handlers
pub mod handlers;

/// Backend error types
pub mod error;

/// Middleware for request processing
pub mod middleware;

/// Entity persistence
pub mod store;

/// Board Aggregate Fetcher
pub mod aggregate;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::create_app;
pub use store::{EntityStore, MemoryStore, SqliteStore, StoreError};
