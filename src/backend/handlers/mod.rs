//! HTTP handlers for boards, lists and cards
//!
//! Reads are open. Mutations and the board listing take a [`Caller`]
//! extractor, so a request without a bearer token is rejected with 401
//! before the body is read.
//!
//! [`Caller`]: crate::backend::middleware::Caller

pub mod boards;
pub mod cards;
pub mod lists;
pub mod types;

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}
