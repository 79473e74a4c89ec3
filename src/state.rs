//! Shared application state for Axum handlers.
//!
//! The state is immutable after startup. Cloning it per request copies a
//! few reference-counted handles.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::AppResult;
use crate::relay::Forwarder;

/// Shared application state for Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Outbound client used by the relay endpoints
    pub forwarder: Forwarder,
    /// Timestamp when the application started
    pub started_at: Instant,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if the outbound HTTP client cannot be
    /// built (e.g. no TLS backend available).
    pub fn new(config: Config) -> AppResult<Self> {
        let forwarder = Forwarder::new(config.relay.timeout)?;

        Ok(Self {
            config: Arc::new(config),
            forwarder,
            started_at: Instant::now(),
        })
    }

    /// Get the application uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
