/**
 * Server Initialization
 *
 * 1. Open the entity store (SQLite when configured, otherwise in memory)
 * 2. Build the application state
 * 3. Create the router
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{open_store, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::{SharedStore, StoreResult};

/// Create and configure the Axum application
pub async fn create_app(config: &ServerConfig) -> StoreResult<Router<()>> {
    tracing::info!("Initializing kanboard server");

    let store = open_store(config).await?;
    let app = create_app_with_store(store);

    tracing::info!("Router configured");
    Ok(app)
}

/// Router over an already opened store
pub fn create_app_with_store(store: SharedStore) -> Router<()> {
    create_router(AppState::new(store))
}
