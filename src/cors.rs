//! CORS preflight responses.
//!
//! Every `OPTIONS` request outside `/health` is answered locally with a
//! fixed permissive header set; nothing is routed or signed.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};

/// Thirty days.
pub const MAX_AGE_SECS: &str = "2592000";

pub const PREFLIGHT_HEADERS: [(HeaderName, &str); 4] = [
    (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (ACCESS_CONTROL_ALLOW_METHODS, "OPTIONS, POST, GET"),
    (ACCESS_CONTROL_MAX_AGE, MAX_AGE_SECS),
    (ACCESS_CONTROL_ALLOW_HEADERS, "*"),
];

#[must_use]
pub fn preflight() -> Response {
    (StatusCode::NO_CONTENT, PREFLIGHT_HEADERS).into_response()
}
