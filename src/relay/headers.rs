//! Header filtering for both legs of a relay.
//!
//! The body is fully buffered in each direction, so message framing is
//! recomputed by whichever side writes it. Framing and hop-by-hop headers
//! are therefore dropped rather than copied. The exception is an upstream
//! answer that never carries a body (`HEAD`, `304`): its `Content-Length`
//! describes the representation and is relayed unchanged.

use axum::http::header::{CONTENT_LENGTH, HOST};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode};

/// Header naming the relay target (alternative to the `target` query parameter).
pub const TARGET_HEADER: &str = "x-target-url";

/// Headers scoped to a single connection (RFC 9110 §7.6.1).
const HOP_BY_HOP: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// True for headers that must never reach the upstream.
pub fn is_excluded_outbound(name: &HeaderName) -> bool {
    *name == HOST
        || *name == CONTENT_LENGTH
        || name.as_str() == TARGET_HEADER
        || is_hop_by_hop(name)
}

/// True for upstream response headers that are not copied back to the caller.
pub fn is_excluded_inbound(name: &HeaderName) -> bool {
    *name == CONTENT_LENGTH || is_hop_by_hop(name)
}

/// True when the upstream response has no body for the caller to frame,
/// so its `Content-Length` must be passed through rather than recomputed.
pub fn is_bodiless(method: &Method, status: StatusCode) -> bool {
    *method == Method::HEAD || status == StatusCode::NOT_MODIFIED
}

/// Copy every header value that may be forwarded to the upstream.
///
/// Multi-valued headers keep all of their values, in order.
pub fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    copy_filtered(headers, is_excluded_outbound)
}

/// Copy every upstream header value that is relayed back to the caller.
///
/// With `bodiless` set (see [`is_bodiless`]) the upstream `Content-Length`
/// is kept as-is.
pub fn relayable_headers(headers: &HeaderMap, bodiless: bool) -> HeaderMap {
    if bodiless {
        copy_filtered(headers, is_hop_by_hop)
    } else {
        copy_filtered(headers, is_excluded_inbound)
    }
}

fn copy_filtered(headers: &HeaderMap, excluded: fn(&HeaderName) -> bool) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !excluded(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
