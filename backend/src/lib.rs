//! # Birthday Tracker Backend
//!
//! REST backend for tracking birthdays, anniversaries and other yearly events.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (business rules, services)
//!     ↓
//! Storage Layer (SQLite)
//! ```
//!
//! [`initialize_backend`] wires the layers together into an [`AppState`] and
//! [`create_router`] exposes it over HTTP.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{BirthdayService, HealthService, SystemClock};
use crate::io::rest::{birthday_apis, database_apis};
use crate::storage::{BirthdayStorage, DbConnection, SqliteBirthdayRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub birthday_service: BirthdayService,
    pub health_service: HealthService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = DbConnection::new(&config.database_url).await?;
    let storage: Arc<dyn BirthdayStorage> = Arc::new(SqliteBirthdayRepository::new(db_conn));

    info!("Setting up domain model");
    let app_state = AppState {
        birthday_service: BirthdayService::new(storage.clone(), Arc::new(SystemClock)),
        health_service: HealthService::new(storage),
    };

    // Informational only; a failed probe does not stop startup
    let health = app_state.health_service.check_database().await;
    if health.connected {
        info!("Database '{}' is reachable", health.database);
    } else {
        warn!(
            "Database '{}' is not reachable at startup: {}",
            health.database,
            health.error.unwrap_or_default()
        );
    }

    Ok(app_state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .cors_allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", config.cors_allowed_origin))?;

    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api/birthdays", birthday_apis::router())
        .nest("/api/database", database_apis::router())
        .layer(cors)
        .with_state(app_state))
}
