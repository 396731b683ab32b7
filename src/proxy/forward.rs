//! Sending the signed request and relaying the upstream response.
//!
//! [`send`] issues the signed request through the pooled client and
//! returns as soon as the upstream status line and headers arrive.
//! [`relay`] turns that response into the caller's response: headers go
//! out first, then the body is handed to hyper as the upstream's own
//! frame stream. hyper pulls the next frame only once the previous one
//! has been written to the caller's socket, so a slow caller stalls the
//! upstream read and nothing accumulates in memory.
//!
//! Errors after the headers are flushed cannot become a `500`; the body
//! error is logged and hyper aborts the connection.

use axum::body::Body;
use axum::response::Response;
use http::Uri;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;

use crate::config::model::Protocol;
use crate::error::ProxyError;
use crate::server::HttpClient;

use super::headers::response_headers;
use super::signer::SignedRequest;

/// Build `{protocol}://{host}{path_and_query}`.
pub fn upstream_uri(protocol: Protocol, host: &str, path_and_query: &str) -> Result<Uri, ProxyError> {
    format!("{protocol}://{host}{path_and_query}")
        .parse::<Uri>()
        .map_err(|e| ProxyError::UriParse {
            source: Box::new(e),
        })
}

pub async fn send(
    client: &HttpClient,
    protocol: Protocol,
    host: &str,
    signed: SignedRequest,
) -> Result<hyper::Response<Incoming>, ProxyError> {
    let uri = upstream_uri(protocol, host, &signed.path_and_query)?;

    let mut builder = hyper::Request::builder().method(signed.method).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        headers.extend(signed.headers);
    }
    let req = builder
        .body(Full::new(signed.body))
        .map_err(|e| ProxyError::HttpRequest {
            source: Box::new(e),
        })?;

    client.request(req).await.map_err(|e| ProxyError::Upstream {
        source: Box::new(e),
    })
}

#[must_use]
pub fn relay(upstream: hyper::Response<Incoming>, correlation_id: String) -> Response {
    let (parts, incoming) = upstream.into_parts();
    let headers = response_headers(&parts.headers, &correlation_id);

    let body = incoming.map_err(move |e| {
        tracing::warn!(
            correlation_id = %correlation_id,
            error = %e,
            "upstream body stream failed, closing connection"
        );
        e
    });

    let mut response = Response::new(Body::new(body));
    *response.status_mut() = parts.status;
    *response.headers_mut() = headers;
    response
}
