use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::relay::parse_target;
use crate::validation::Validate;

/// Upper bound on a caller-supplied relay timeout, in seconds.
pub const MAX_RELAY_TIMEOUT_SECS: u64 = 300;

/// JSON-body variant of the relay: the caller describes the outbound request.
///
/// ```json
/// {
///   "target_url": "https://api.example.com/items",
///   "method": "POST",
///   "headers": { "Authorization": "Bearer abc" },
///   "body": { "name": "widget" },
///   "timeout": 10
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct RelayConfigRequest {
    #[serde(default)]
    pub target_url: String,
    /// Outbound method; defaults to the inbound request's method
    #[serde(default)]
    pub method: Option<String>,
    /// Headers set on the outbound request (replacing any of the same name)
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Any JSON value; serialized as the outbound body when present
    #[serde(default)]
    pub body: Option<serde_json::Value>,
    /// Timeout in seconds; 0 or absent uses the configured default
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Validate for RelayConfigRequest {
    fn validate(&self) -> AppResult<()> {
        if self.target_url.is_empty() {
            return Err(AppError::BadRequest(
                "Missing target_url in request body".to_string(),
            ));
        }

        if let Some(secs) = self.timeout
            && secs > MAX_RELAY_TIMEOUT_SECS
        {
            return Err(AppError::BadRequest(format!(
                "timeout cannot exceed {MAX_RELAY_TIMEOUT_SECS} seconds (got {secs})"
            )));
        }

        parse_target(&self.target_url).map(|_| ())
    }
}
