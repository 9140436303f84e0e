//! # Axum Helpers
//!
//! Shared plumbing for the Axum services in this workspace.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health endpoint, graceful shutdown
//! - **[`http`]**: CORS, security headers, pagination header names
//! - **[`errors`]**: `AppError` and the JSON `ErrorResponse` body
//! - **[`extractors`]**: integer id path and validated JSON extractors
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes).await?
//!     .merge(health_router(app_info!()));
//! create_production_app(router, &ServerConfig::default(), Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, cors_layer_from_env, headers, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};
