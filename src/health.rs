//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::repository::RestaurantStore;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK while the process is running.
pub async fn health<S>(State(state): State<AppState<S>>) -> impl IntoResponse
where
    S: RestaurantStore + Clone + Send + Sync + 'static,
{
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe)
///
/// Returns 200 OK once the store answers a ping, 503 otherwise.
pub async fn readiness<S>(State(state): State<AppState<S>>) -> impl IntoResponse
where
    S: RestaurantStore + Clone + Send + Sync + 'static,
{
    let service = state.config().service.name.clone();

    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                ready: true,
                service,
                message: Some("Connected".to_string()),
            }),
        ),
        Err(e) => {
            tracing::error!("Database readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    ready: false,
                    service,
                    message: Some("Database unreachable".to_string()),
                }),
            )
        }
    }
}
