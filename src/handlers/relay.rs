//! Relay endpoints.
//!
//! # Endpoints
//!
//! - `ANY /api/v1/relay` - forward the inbound request to the URL named by the
//!   `target` query parameter or the `X-Target-URL` header
//! - `ANY /api/v1/relay/config` - forward a request described by a JSON body
//!
//! ```bash
//! curl -X POST "http://localhost:8080/api/v1/relay?target=https://httpbin.org/post" \
//!      -H 'Content-Type: application/json' -d '{"hello": "world"}'
//!
//! curl -X POST http://localhost:8080/api/v1/relay/config \
//!      -H 'Content-Type: application/json' \
//!      -d '{"target_url": "https://httpbin.org/get", "method": "GET", "timeout": 5}'
//! ```

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method};
use tracing::{debug, instrument};

use crate::error::{AppError, AppResult};
use crate::models::RelayConfigRequest;
use crate::relay::{RelayRequest, RelayResponse, resolve_target};
use crate::state::AppState;
use crate::validation::ValidatedJson;

/// Name of the query parameter carrying the relay target.
const TARGET_PARAM: &str = "target";

/// First `target` value in the query; later repeats are ignored.
fn target_param(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .find(|(key, _)| key == TARGET_PARAM)
        .map(|(_, value)| value)
}

/// Forward the inbound request as-is.
///
/// The query string is consumed by the relay; the outbound URL is exactly
/// the resolved target.
#[instrument(skip_all, fields(method = %method))]
pub async fn relay(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<RelayResponse> {
    let Query(pairs) =
        query.map_err(|e| AppError::BadRequest(format!("Invalid query string: {e}")))?;

    let target = resolve_target(target_param(pairs).as_deref(), &headers)?;
    let body = body?;

    debug!(%target, bytes = body.len(), "Relaying inbound request");

    let request = RelayRequest::from_inbound(method, target, &headers, body);
    state.forwarder.forward(request).await
}

/// Forward a request described by a JSON body.
#[instrument(skip_all, fields(method = %method))]
pub async fn relay_with_config(
    State(state): State<AppState>,
    method: Method,
    ValidatedJson(config): ValidatedJson<RelayConfigRequest>,
) -> AppResult<RelayResponse> {
    let request = RelayRequest::from_config(config, &method)?;

    debug!(
        target = %request.target,
        outbound_method = %request.method,
        timeout = ?request.timeout,
        "Relaying configured request"
    );

    state.forwarder.forward(request).await
}
