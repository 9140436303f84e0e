//! Products API routes

use axum::Router;
use domain_inventory::{handlers, InventoryService, PgInventoryRepository};

use crate::state::{AppState, Store};

/// Create products router over whichever store is configured
pub fn router(state: &AppState) -> Router {
    match &state.store {
        Store::Memory(repository) => handlers::router(InventoryService::new(repository.clone())),
        Store::Postgres(db) => {
            handlers::router(InventoryService::new(PgInventoryRepository::new(db.clone())))
        }
    }
}
