use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};

use crate::models::HealthResponse;
use crate::state::AppState;

use super::not_found;

/// Health routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health_check).fallback(not_found))
}

/// GET /api/health - Liveness check, independent of mail configuration
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Portfolio backend is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
