//! Health check handlers

use crate::{AppState, WebResult};
use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub variant: String,
    pub listings: i64,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> WebResult<Json<HealthResponse>> {
    let listings = state.store.count().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        variant: state.config.variant.to_string(),
        listings,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    }))
}
