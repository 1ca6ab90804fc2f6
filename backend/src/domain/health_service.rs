use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::storage::BirthdayStorage;

/// Outcome of a connectivity probe against the store
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub database: String,
    /// Round trip in milliseconds, only set when connected
    pub response_time_ms: Option<u128>,
    pub error: Option<String>,
}

/// Informational probes against the storage collaborator. Never fails;
/// an unreachable store is reported as `connected: false`.
#[derive(Clone)]
pub struct HealthService {
    storage: Arc<dyn BirthdayStorage>,
}

impl HealthService {
    pub fn new(storage: Arc<dyn BirthdayStorage>) -> Self {
        Self { storage }
    }

    /// Ping the store and time the round trip
    pub async fn check_database(&self) -> DatabaseHealth {
        let database = self.storage.database_name();
        let started = Instant::now();

        match self.storage.ping().await {
            Ok(()) => {
                let elapsed = started.elapsed().as_millis();
                info!("Database '{}' reachable in {}ms", database, elapsed);
                DatabaseHealth {
                    connected: true,
                    database,
                    response_time_ms: Some(elapsed),
                    error: None,
                }
            }
            Err(e) => {
                warn!("Database '{}' unreachable: {}", database, e);
                DatabaseHealth {
                    connected: false,
                    database,
                    response_time_ms: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
