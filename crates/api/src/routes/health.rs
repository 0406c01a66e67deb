use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether store A (calls) is reachable.
    pub calls_db_healthy: bool,
    /// Whether store B (properties) is reachable.
    pub properties_db_healthy: bool,
}

/// GET /health -- returns service and store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let calls_db_healthy = closer_db::health_check(&state.calls_pool).await.is_ok();
    let properties_db_healthy = closer_db::health_check(&state.properties_pool).await.is_ok();

    let status = if calls_db_healthy && properties_db_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        calls_db_healthy,
        properties_db_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
