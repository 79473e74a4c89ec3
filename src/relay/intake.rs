//! Request intake: locating and checking the target, building [`RelayRequest`]s.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use tracing::debug;
use url::Url;

use super::RelayRequest;
use super::headers::{TARGET_HEADER, forwardable_headers, is_excluded_outbound};
use crate::error::{AppError, AppResult};
use crate::models::RelayConfigRequest;

const MISSING_TARGET: &str =
    "Missing target URL. Please provide 'target' query parameter or 'X-Target-URL' header";

const INVALID_TARGET: &str = "Invalid target URL";

/// Find the relay target: the `target` query parameter first, then the
/// `X-Target-URL` header. Empty values count as absent.
pub fn resolve_target(query_target: Option<&str>, headers: &HeaderMap) -> AppResult<Url> {
    if let Some(target) = query_target.filter(|t| !t.is_empty()) {
        return parse_target(target);
    }

    match headers.get(TARGET_HEADER) {
        Some(value) if !value.is_empty() => {
            let target = value.to_str().map_err(|_| {
                debug!("Target header is not visible ASCII");
                AppError::BadRequest(INVALID_TARGET.to_string())
            })?;
            parse_target(target)
        }
        _ => Err(AppError::BadRequest(MISSING_TARGET.to_string())),
    }
}

/// Parse a relay target.
///
/// Accepts absolute `http`/`https` URLs only. Control characters are
/// rejected up front because the URL parser would otherwise strip tabs and
/// newlines silently.
pub fn parse_target(raw: &str) -> AppResult<Url> {
    let invalid = |reason: &str| {
        debug!(target = %raw.escape_debug(), reason, "Rejected relay target");
        AppError::BadRequest(INVALID_TARGET.to_string())
    };

    if raw.is_empty() {
        return Err(invalid("empty"));
    }

    if let Some(pos) = raw.chars().position(char::is_control) {
        return Err(invalid(&format!("control character at position {pos}")));
    }

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("unsupported scheme"));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }

    Ok(url)
}

impl RelayRequest {
    /// Build a relay request from an inbound request aimed at the relay endpoint.
    pub fn from_inbound(method: Method, target: Url, headers: &HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            target,
            headers: forwardable_headers(headers),
            body,
            timeout: None,
        }
    }

    /// Build a relay request from the JSON-body variant.
    ///
    /// `inbound_method` is used when the body does not name a method.
    pub fn from_config(config: RelayConfigRequest, inbound_method: &Method) -> AppResult<Self> {
        let target = parse_target(&config.target_url)?;

        let method = match config.method.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                .map_err(|_| AppError::BadRequest(format!("Invalid HTTP method: {m}")))?,
            _ => inbound_method.clone(),
        };

        let mut headers = HeaderMap::with_capacity(config.headers.len() + 1);
        for (name, value) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| AppError::BadRequest(format!("Invalid header name: {name}")))?;
            if is_excluded_outbound(&header_name) {
                debug!(header = %header_name, "Dropping excluded header from relay config");
                continue;
            }
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| AppError::BadRequest(format!("Invalid value for header: {name}")))?;
            headers.insert(header_name, header_value);
        }

        let body = match config.body {
            Some(value) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                Bytes::from(serde_json::to_vec(&value)?)
            }
            None => Bytes::new(),
        };

        let timeout = config
            .timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            method,
            target,
            headers,
            body,
            timeout,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(json: &str) -> RelayConfigRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_query_target_takes_priority() {
        let mut headers = HeaderMap::new();
        headers.insert(TARGET_HEADER, HeaderValue::from_static("http://header.example/"));

        let url = resolve_target(Some("http://query.example/"), &headers).unwrap();
        assert_eq!(url.host_str(), Some("query.example"));
    }

    #[test]
    fn test_empty_query_falls_back_to_header() {
        let mut headers = HeaderMap::new();
        headers.insert(TARGET_HEADER, HeaderValue::from_static("http://header.example/a"));

        let url = resolve_target(Some(""), &headers).unwrap();
        assert_eq!(url.as_str(), "http://header.example/a");
    }

    #[test]
    fn test_missing_target_is_descriptive() {
        let err = resolve_target(None, &HeaderMap::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'target' query parameter"));
        assert!(msg.contains("'X-Target-URL' header"));
    }

    #[test]
    fn test_control_characters_rejected() {
        assert!(parse_target("http://example.com/\x7f").is_err());
        assert!(parse_target("http://exa\tmple.com/").is_err());
        assert!(parse_target("http://example.com/\npath").is_err());
    }

    #[test]
    fn test_relative_and_non_http_targets_rejected() {
        assert!(parse_target("/just/a/path").is_err());
        assert!(parse_target("example.com").is_err());
        assert!(parse_target("ftp://example.com/file").is_err());
        assert!(parse_target("file:///etc/passwd").is_err());
        assert!(parse_target("").is_err());
    }

    #[test]
    fn test_valid_targets_parse() {
        let url = parse_target("https://api.example.com:8443/v1/items?x=1").unwrap();
        assert_eq!(url.port(), Some(8443));
        assert_eq!(url.query(), Some("x=1"));
    }

    #[test]
    fn test_from_config_defaults_to_inbound_method() {
        let request = RelayRequest::from_config(
            config(r#"{"target_url": "http://example.com"}"#),
            &Method::PUT,
        )
        .unwrap();

        assert_eq!(request.method, Method::PUT);
        assert!(request.body.is_empty());
        assert!(request.timeout.is_none());
        assert!(!request.headers.contains_key(CONTENT_TYPE));
    }

    #[test]
    fn test_from_config_json_body_sets_content_type() {
        let request = RelayRequest::from_config(
            config(r#"{"target_url": "http://example.com", "method": "patch", "body": {"a": 1}, "timeout": 5}"#),
            &Method::POST,
        )
        .unwrap();

        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.body, Bytes::from_static(br#"{"a":1}"#));
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_from_config_keeps_explicit_content_type() {
        let mut cfg = config(r#"{"target_url": "http://example.com", "body": "text"}"#);
        cfg.headers = HashMap::from([("Content-Type".to_string(), "text/plain".to_string())]);

        let request = RelayRequest::from_config(cfg, &Method::POST).unwrap();
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(request.body, Bytes::from_static(b"\"text\""));
    }

    #[test]
    fn test_from_config_zero_timeout_uses_default() {
        let request = RelayRequest::from_config(
            config(r#"{"target_url": "http://example.com", "timeout": 0}"#),
            &Method::GET,
        )
        .unwrap();
        assert!(request.timeout.is_none());
    }

    #[test]
    fn test_from_config_rejects_bad_headers_and_method() {
        let mut cfg = config(r#"{"target_url": "http://example.com"}"#);
        cfg.headers = HashMap::from([("bad header".to_string(), "x".to_string())]);
        assert!(RelayRequest::from_config(cfg, &Method::GET).is_err());

        let cfg = config(r#"{"target_url": "http://example.com", "method": "GE T"}"#);
        assert!(RelayRequest::from_config(cfg, &Method::GET).is_err());
    }

    #[test]
    fn test_from_config_drops_host_header() {
        let mut cfg = config(r#"{"target_url": "http://example.com"}"#);
        cfg.headers = HashMap::from([
            ("Host".to_string(), "spoofed.example".to_string()),
            ("X-Custom".to_string(), "1".to_string()),
        ]);

        let request = RelayRequest::from_config(cfg, &Method::GET).unwrap();
        assert!(!request.headers.contains_key("host"));
        assert_eq!(request.headers.get("x-custom").unwrap(), "1");
    }
}
