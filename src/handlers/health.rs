//! Landing page, health check and the JSON 404 fallback.

use axum::Json;
use axum::http::Uri;
use chrono::Utc;
use tracing::instrument;

use crate::error::AppError;
use crate::models::{EndpointIndex, HealthResponse, HomeResponse};

/// Health check endpoint.
///
/// Always returns 200 while the process is serving.
///
/// # Response Body
///
/// ```json
/// {
///   "status": "ok",
///   "message": "Server is running",
///   "version": "1.0.0",
///   "timestamp": "2024-01-15T10:30:00Z"
/// }
/// ```
#[instrument]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Landing page listing the main entry points.
#[instrument]
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Welcome to Relay API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: EndpointIndex {
            health: "/health",
            users: "/api/v1/users",
            relay: "/api/v1/relay",
        },
    })
}

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
