//! # REST API for Database Health
//!
//! Informational connectivity probes, mounted under `/api/database`. These
//! report a failed probe as 503 with a status flag instead of an error body.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use shared::{DatabasePingResponse, DatabaseStatusResponse, STATUS_SUCCESS};
use tracing::info;

use crate::AppState;

/// Create the database API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_database_status))
        .route("/ping", get(ping_database))
}

/// Whether the database is reachable
pub async fn get_database_status(State(state): State<AppState>) -> (StatusCode, Json<DatabaseStatusResponse>) {
    info!("GET /api/database/status");

    let health = state.health_service.check_database().await;
    if health.connected {
        (
            StatusCode::OK,
            Json(DatabaseStatusResponse {
                status: "connected".to_string(),
                message: "Database connection is healthy".to_string(),
                database: Some(health.database),
                error: None,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(DatabaseStatusResponse {
                status: "disconnected".to_string(),
                message: "Database connection failed".to_string(),
                database: None,
                error: health.error,
            }),
        )
    }
}

/// Time a round trip to the database
pub async fn ping_database(State(state): State<AppState>) -> (StatusCode, Json<DatabasePingResponse>) {
    info!("GET /api/database/ping");

    let health = state.health_service.check_database().await;
    match health.response_time_ms {
        Some(millis) if health.connected => (
            StatusCode::OK,
            Json(DatabasePingResponse {
                status: STATUS_SUCCESS.to_string(),
                message: "Database ping successful".to_string(),
                database: Some(health.database),
                response_time: Some(format!("{}ms", millis)),
                error: None,
            }),
        ),
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(DatabasePingResponse {
                status: "failed".to_string(),
                message: "Database ping failed".to_string(),
                database: None,
                response_time: None,
                error: health.error,
            }),
        ),
    }
}
