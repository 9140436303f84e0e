//! Readiness endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use database::postgres::check_health;
use serde_json::Value;

use crate::state::{AppState, Store};

type ReadyResponse = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

async fn ready(State(store): State<Store>) -> ReadyResponse {
    match store {
        Store::Memory(_) => run_health_checks(Vec::new()).await,
        Store::Postgres(db) => {
            let database: HealthCheckFuture<'_> =
                Box::pin(async { check_health(&db).await.map_err(|e| e.to_string()) });
            run_health_checks(vec![("database", database)]).await
        }
    }
}

/// `/ready`, 503 while the store is unreachable
pub fn router(state: &AppState) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(state.store.clone())
}
