//! Route Configuration Module
//!
//! - **`router`** - Main router creation, tracing and CORS layers
//! - **`api_routes`** - Board, list and card endpoints

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
