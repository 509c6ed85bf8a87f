//! Middleware Module
//!
//! Request processing shared by handlers. Currently caller identity
//! extraction.

pub mod auth;

pub use auth::{extract_caller, Caller};
