//! Fuzz testing for relay target parsing and header filtering.
//!
//! ```bash
//! cargo +nightly fuzz run fuzz_relay_target -- -max_total_time=60
//! ```

#![no_main]

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use libfuzzer_sys::fuzz_target;
use relay_api::relay::{TARGET_HEADER, forwardable_headers, parse_target, resolve_target};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(url) = parse_target(s) {
            // Anything accepted must be an absolute http(s) URL free of control characters
            assert!(matches!(url.scheme(), "http" | "https"));
            assert!(url.host_str().is_some());
            assert!(!s.chars().any(char::is_control));
        }
    }

    // Arbitrary header bytes must never panic and never leak the target header
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_bytes(data) {
        headers.insert(HeaderName::from_static(TARGET_HEADER), value.clone());
        headers.insert("x-fuzz", value);
    }

    let _ = resolve_target(None, &headers);
    assert!(!forwardable_headers(&headers).contains_key(TARGET_HEADER));
});
