use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Returns the health status of the API and its store
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();

    let store_status = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Store ping failed");
            "disconnected"
        }
    };
    services.insert("store".to_string(), store_status.to_string());

    let status = if store_status == "connected" { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}
