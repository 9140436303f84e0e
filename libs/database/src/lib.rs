//! Database connectors and shared plumbing.
//!
//! # Features
//!
//! - `postgres` (default): PostgreSQL via SeaORM
//! - `config`: `core_config::FromEnv` for the connector configs
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{PostgresConfig, connect_from_config_with_retry};
//!
//! let config = PostgresConfig::from_env()?;
//! let db = connect_from_config_with_retry(config, None).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
