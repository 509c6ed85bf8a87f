//! Kanboard - Main Library
//!
//! A kanban board service: boards hold ordered lists, lists hold ordered
//! cards, and drag-and-drop reorders are applied optimistically on the
//! client and persisted as one atomic batch on the server.
//!
//! # Module Structure
//!
//! - **`shared`** - Types and pure logic used by both sides
//!   - Board, list and card records
//!   - Position assignment and the reorder engine
//!   - Board aggregate assembly, shared errors, client configuration
//!
//! - **`backend`** - Server-side code (only compiled with the `ssr` feature)
//!   - Axum HTTP server and handlers
//!   - Entity stores (in-memory, SQLite)
//!   - Board aggregate fetcher
//!
//! - **`client`** - Client Sync Layer
//!   - Board state container
//!   - Two-phase reorder commit with sequence tagging
//!   - reqwest board API client
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the `backend` module and the
//!   `kanboard-server` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use kanboard::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Client Sync Layer
pub mod client;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
