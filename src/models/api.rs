use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving
    pub status: String,
    /// Human-readable status line
    pub message: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
}

/// Landing page response for `GET /`.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub message: String,
    pub version: String,
    pub endpoints: EndpointIndex,
}

/// Entry points advertised on the landing page.
#[derive(Debug, Serialize)]
pub struct EndpointIndex {
    pub health: &'static str,
    pub users: &'static str,
    pub relay: &'static str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            message: "Server is running".to_string(),
            version: "1.0.0".to_string(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&response).expect("Serialization should succeed");
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
    }

    #[test]
    fn test_home_response_lists_endpoints() {
        let response = HomeResponse {
            message: "Welcome".to_string(),
            version: "1.0.0".to_string(),
            endpoints: EndpointIndex {
                health: "/health",
                users: "/api/v1/users",
                relay: "/api/v1/relay",
            },
        };

        let value = serde_json::to_value(&response).expect("Serialization should succeed");
        assert_eq!(value["endpoints"]["users"], "/api/v1/users");
    }
}
