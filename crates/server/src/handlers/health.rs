//! Liveness endpoints.

use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Banner response.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// GET / - Service banner.
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: state.config.server.banner.clone(),
    })
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub network: String,
    pub version: &'static str,
}

/// GET /health - Liveness check.
///
/// Does not contact the network, so probes stay cheap.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        network: state.network.name().to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
