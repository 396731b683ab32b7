//! Unified error type for the proxy.
//!
//! [`ProxyError`] covers startup failures (bad address, invalid upstream
//! host), per-request failures that happen before any response byte is
//! flushed (missing credentials, unbuildable URI, upstream connect
//! errors), and CLI health-check failures. Per-request variants convert
//! into a plain-text `500` via [`IntoResponse`].

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProxyError {
    #[error(
        "AWS credentials are not configured.\n\n  \
         Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY (or add them to .env)."
    )]
    MissingCredentials,

    #[error("Invalid upstream host '{host}': {reason}")]
    InvalidUpstream { host: String, reason: String },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid signed header: {source}")]
    InvalidHeader {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid signing key: {0}")]
    SigningKey(#[from] hmac::digest::InvalidLength),

    #[error("Upstream request failed: {source}")]
    Upstream {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),

    #[error("Instance reported status '{0}'")]
    Unhealthy(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        // The caller only ever sees a generic message; details go to the log.
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            "Internal Server Error",
        )
            .into_response()
    }
}
