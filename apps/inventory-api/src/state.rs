//! Application state management

use database::postgres::{connect_from_config_with_retry, DatabaseConnection};
use domain_inventory::{CreateProductType, InMemoryInventoryRepository};
use tracing::info;

use crate::config::{Config, StoreBackend};

/// Connected backing store
#[derive(Clone)]
pub enum Store {
    Memory(InMemoryInventoryRepository),
    Postgres(DatabaseConnection),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
}

impl AppState {
    pub async fn connect(config: Config) -> eyre::Result<Self> {
        let store = match &config.store {
            StoreBackend::Memory { product_types } => {
                info!(product_types = product_types.len(), "Using in-memory store");
                Store::Memory(seeded_memory_store(product_types).await?)
            }
            StoreBackend::Postgres(pg) => {
                let db = connect_from_config_with_retry(pg.clone(), None).await?;
                Store::Postgres(db)
            }
        };

        Ok(Self { config, store })
    }
}

async fn seeded_memory_store(
    product_types: &[String],
) -> eyre::Result<InMemoryInventoryRepository> {
    let repo = InMemoryInventoryRepository::new();
    for description in product_types {
        repo.insert_product_type(CreateProductType {
            description: description.clone(),
        })
        .await?;
    }
    Ok(repo)
}
