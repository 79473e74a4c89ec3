//! Single-hop forward relay.
//!
//! A caller names an absolute `http`/`https` target and the relay issues one
//! outbound request to it, returning the upstream status, headers and body
//! unchanged. There is no retry, caching, or body rewriting.
//!
//! ```text
//! caller ──► /api/v1/relay?target=…  ──► Forwarder ──► upstream
//!        ◄── status + headers + body ◄──           ◄──
//! ```
//!
//! Two intake shapes are supported:
//!
//! - [`RelayRequest::from_inbound`]: method, headers and body are taken from
//!   the inbound request, the target from the `target` query parameter or
//!   the `X-Target-URL` header.
//! - [`RelayRequest::from_config`]: a JSON body describes the outbound
//!   request (target, method, headers, body, timeout).

mod headers;
mod intake;
mod response;

use std::error::Error as _;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{AppError, AppResult};

pub use headers::{TARGET_HEADER, forwardable_headers, is_bodiless, relayable_headers};
pub use intake::{parse_target, resolve_target};

/// A fully-resolved outbound request.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: Method,
    pub target: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Overrides the forwarder's default timeout for this call
    pub timeout: Option<Duration>,
}

/// The buffered upstream answer, relayed verbatim.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Issues relay requests on a shared HTTP client.
///
/// Cloning is cheap; the underlying client is reference counted. Idle
/// connections are not pooled, so every relay opens a fresh connection
/// to its target.
#[derive(Clone, Debug)]
pub struct Forwarder {
    client: Client,
    default_timeout: Duration,
}

impl Forwarder {
    /// Build a forwarder whose calls time out after `default_timeout`
    /// unless the request carries its own timeout.
    pub fn new(default_timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            default_timeout,
        })
    }

    /// Default timeout applied when a request does not set one.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Send `request` upstream and buffer the response.
    ///
    /// # Errors
    ///
    /// - `UpstreamTimeout` if the target does not answer in time
    /// - `BadGateway` for DNS, connect, TLS, or protocol failures
    /// - `Internal` if the upstream body cannot be read
    #[instrument(skip_all, fields(method = %request.method, target = %request.target))]
    pub async fn forward(&self, request: RelayRequest) -> AppResult<RelayResponse> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);
        let method = request.method.clone();

        let mut builder = self
            .client
            .request(method.clone(), request.target)
            .headers(request.headers)
            .timeout(timeout);

        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| send_error(e, timeout))?;

        let status = response.status();
        let headers = relayable_headers(response.headers(), is_bodiless(&method, status));

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                AppError::UpstreamTimeout(format!("{timeout:?}"))
            } else {
                AppError::Internal(format!("Failed to read upstream response: {e}"))
            }
        })?;

        debug!(status = status.as_u16(), bytes = body.len(), "Relay completed");

        Ok(RelayResponse {
            status,
            headers,
            body,
        })
    }
}

/// Classify a failed send.
fn send_error(error: reqwest::Error, timeout: Duration) -> AppError {
    if error.is_timeout() {
        warn!(?timeout, "Upstream timed out");
        return AppError::UpstreamTimeout(format!("{timeout:?}"));
    }

    if error.is_builder() {
        return AppError::Internal(format!("Failed to build outbound request: {error}"));
    }

    // reqwest's Display stops at the outermost cause; walk to the root
    let mut reason = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }

    warn!(%reason, "Upstream request failed");
    AppError::BadGateway(reason)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarder_keeps_default_timeout() {
        let forwarder = Forwarder::new(Duration::from_secs(30)).unwrap();
        assert_eq!(forwarder.default_timeout(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_connection_refused_is_bad_gateway() {
        // Bind then drop to get a port with no listener
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let forwarder = Forwarder::new(Duration::from_secs(5)).unwrap();
        let request = RelayRequest::from_inbound(
            Method::GET,
            Url::parse(&format!("http://{addr}/")).unwrap(),
            &HeaderMap::new(),
            Bytes::new(),
        );

        match forwarder.forward(request).await {
            Err(AppError::BadGateway(reason)) => assert!(!reason.is_empty()),
            other => panic!("expected bad gateway, got {other:?}"),
        }
    }
}
