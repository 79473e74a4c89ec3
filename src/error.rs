use axum::extract::rejection::{BytesRejection, FailedToBufferBody, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::validation::FieldError;

/// Application-wide error types with appropriate HTTP status codes.
///
/// # Relay Errors
///
/// Failures on the outbound leg of a relay are split so that logs can tell
/// them apart, but both surface to the caller as `502 Bad Gateway`:
///
/// - `BadGateway` - DNS, connect, or protocol failure talking to the target
/// - `UpstreamTimeout` - the target did not answer within the relay timeout
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Failed to forward request: {0}")]
    BadGateway(String),

    #[error("Upstream timed out: {0}")]
    UpstreamTimeout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Error response body for API endpoints.
#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldError]>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Client errors are routine; only server-side failures are logged at error level
        match &self {
            AppError::BadRequest(_)
            | AppError::Validation(_)
            | AppError::NotFound(_)
            | AppError::PayloadTooLarge(_) => tracing::debug!(error = %self, "Request rejected"),
            _ => tracing::error!(error = %self, "Request failed"),
        }

        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                msg.clone(),
            ),

            // Gateway errors carry the transport reason; the caller chose the target
            AppError::BadGateway(_) => (
                StatusCode::BAD_GATEWAY,
                "bad_gateway",
                self.to_string(),
            ),
            AppError::UpstreamTimeout(msg) => (
                StatusCode::BAD_GATEWAY,
                "upstream_timeout",
                format!("Failed to forward request: upstream timed out after {msg}"),
            ),

            // Internal errors - never expose internal details to clients
            AppError::Serialization(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred. Please contact support if the issue persists."
                    .to_string(),
            ),
            AppError::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "config_error",
                "Service configuration error. Please contact support.".to_string(),
            ),
        };

        let details = match &self {
            AppError::Validation(errors) => Some(errors.as_slice()),
            _ => None,
        };

        let body = ErrorResponse {
            error: error_type,
            message,
            details,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(BytesRejection::FailedToBufferBody(
                FailedToBufferBody::LengthLimitError(e),
            )) => AppError::PayloadTooLarge(e.to_string()),
            other => {
                tracing::debug!(reason = %other.body_text(), "Rejected JSON body");
                AppError::BadRequest("Invalid request body".to_string())
            }
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        match rejection {
            BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(e)) => {
                AppError::PayloadTooLarge(e.to_string())
            }
            other => AppError::Internal(format!("Failed to read request body: {other}")),
        }
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_exposes_message() {
        let response = AppError::BadRequest("Invalid target URL".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["message"], "Invalid target URL");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let errors = vec![FieldError {
            field: "email".to_string(),
            tag: "email",
            value: Some("nope".to_string()),
            message: "email must be a valid email address".to_string(),
        }];
        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "email");
        assert_eq!(body["details"][0]["tag"], "email");
    }

    #[tokio::test]
    async fn test_gateway_errors_map_to_502() {
        let response = AppError::BadGateway("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Failed to forward request: connection refused");

        let response = AppError::UpstreamTimeout("1s".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "upstream_timeout");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::Internal("secret stack detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert!(!body["message"].as_str().unwrap().contains("secret"));
    }
}
