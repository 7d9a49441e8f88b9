//! Health check handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use domain_instrument::SessionFactory;

use crate::{error::ApiError, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check; opens and closes an empty transaction scope
pub async fn readiness_check<F: SessionFactory>(
    State(state): State<AppState<F>>,
) -> Result<Json<HealthResponse>, ApiError> {
    state
        .service
        .ping()
        .await
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
