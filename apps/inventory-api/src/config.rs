//! Configuration for Inventory API

use core_config::{
    app_info, env_or_default, server::ServerConfig, AppInfo, ConfigError, FromEnv,
};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Where products, types and stock entries live
#[derive(Clone, Debug)]
pub enum StoreBackend {
    /// In-process tables, seeded with these product type descriptions
    Memory { product_types: Vec<String> },
    Postgres(PostgresConfig),
}

impl FromEnv for StoreBackend {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or_default("INVENTORY_STORE", "memory");

        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory {
                product_types: product_types_from_env(),
            }),
            "postgres" => Ok(StoreBackend::Postgres(PostgresConfig::from_env()?)),
            other => Err(ConfigError::ParseError {
                key: "INVENTORY_STORE".to_string(),
                details: format!("unknown store '{}', expected 'memory' or 'postgres'", other),
            }),
        }
    }
}

/// Comma separated `INVENTORY_PRODUCT_TYPES`, blank items dropped
fn product_types_from_env() -> Vec<String> {
    env_or_default("INVENTORY_PRODUCT_TYPES", "General")
        .split(',')
        .map(str::trim)
        .filter(|description| !description.is_empty())
        .map(str::to_string)
        .collect()
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub store: StoreBackend,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let store = StoreBackend::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            store,
        })
    }
}
