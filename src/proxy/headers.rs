//! Which headers cross the proxy, in each direction.
//!
//! Upstream requests carry only the signer's headers plus a short
//! allow-list of end-to-end content headers from the caller; everything
//! else (cookies, hop-by-hop, caller `authorization`) stays behind.
//! Downstream responses carry the upstream `content-type` (or an event
//! stream default), an open CORS origin, and the correlation id.

use axum::http::header::{ACCEPT, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Caller headers forwarded upstream (and therefore signed).
pub static FORWARDED_REQUEST_HEADERS: [HeaderName; 2] = [ACCEPT, CONTENT_TYPE];

/// `content-type` used when the upstream response omits one.
pub const DEFAULT_RESPONSE_CONTENT_TYPE: &str = "text/event-stream";

pub const CORRELATION_ID: &str = "x-correlation-id";

#[must_use]
pub fn forwarded_request_headers(original: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in FORWARDED_REQUEST_HEADERS.iter() {
        for value in original.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

/// Response headers sent to the caller before any body byte.
#[must_use]
pub fn response_headers(upstream: &HeaderMap, correlation_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(3);

    let content_type = upstream
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_RESPONSE_CONTENT_TYPE));
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    if let Ok(val) = HeaderValue::from_str(correlation_id) {
        headers.insert(CORRELATION_ID, val);
    }

    headers
}
