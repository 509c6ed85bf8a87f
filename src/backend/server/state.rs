/**
 * Application State Management
 *
 * `AppState` is the router state shared by every handler. It holds the
 * entity store behind an `Arc<dyn EntityStore>` so the in-memory and SQLite
 * stores are interchangeable at startup.
 *
 * # Example
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use kanboard::backend::store::SharedStore;
 *
 * async fn handler(State(store): State<SharedStore>) {
 *     let boards = store.find_boards_by_owner("user-1").await;
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::store::{EntityStore, MemoryStore, SharedStore};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn with_store<S: EntityStore + 'static>(store: S) -> Self {
        Self::new(Arc::new(store))
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
