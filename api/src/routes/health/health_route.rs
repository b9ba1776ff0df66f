use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Local;
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    /// Local time, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
}

/// Handler: GET /api/health
pub async fn health_route(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: state.config.app_version.clone(),
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}
