//! Client Sync Layer
//!
//! Keeps a local copy of one board, applies drag-and-drop reorders to it
//! optimistically and persists them through a [`BoardApi`].
//!
//! ```rust,no_run
//! use kanboard::client::{BoardSync, HttpBoardApi, SyncOutcome};
//! use kanboard::shared::AppConfig;
//! # async fn example(board_id: uuid::Uuid, drop: kanboard::shared::DragResult) -> Result<(), kanboard::client::SyncError> {
//! let config = AppConfig::builder().server_url("http://127.0.0.1:5000").build()?;
//! let api = HttpBoardApi::new(config)?.with_token("user-1");
//!
//! let mut sync = BoardSync::load(&api, board_id).await?;
//! if let Some(commit) = sync.begin_reorder(drop)? {
//!     // the UI renders sync.state() here, before the request completes
//!     let response = commit.send(&api, api.config().refetch_on_success).await;
//!     if let SyncOutcome::RefreshNeeded(_) = sync.finish(response) {
//!         sync.refresh(&api).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod state;
pub mod sync;

pub use api::{BoardApi, HttpBoardApi};
pub use error::SyncError;
pub use state::{BoardState, ReorderPlan};
pub use sync::{BoardSync, CommitResponse, PendingCommit, SyncOutcome};
