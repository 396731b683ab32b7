//! Core rewrite-sign-forward-stream pipeline.
//!
//! The [`forward_handler`] function is the Axum fallback that receives
//! every non-`/health` request. `OPTIONS` is answered as a CORS
//! preflight; everything else is routed ([`routing`], [`rewrite`]),
//! signed ([`signer`]) and sent upstream with the response streamed back
//! ([`forward`]). Header policy lives in [`headers`].

pub mod forward;
pub mod headers;
pub mod rewrite;
pub mod routing;
pub mod signer;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};

use crate::cors;
use crate::error::ProxyError;
use crate::server::AppState;

use signer::SigningRequest;

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return cors::preflight();
    }

    let correlation_id = req_headers
        .get(headers::CORRELATION_ID)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    let start = Instant::now();
    match proxy_request(&state, &method, &uri, &req_headers, body, &correlation_id).await {
        Ok(upstream) => {
            tracing::info!(
                correlation_id = %correlation_id,
                status = upstream.status().as_u16(),
                latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "upstream responded, streaming body"
            );
            forward::relay(upstream, correlation_id)
        }
        Err(e) => {
            tracing::error!(
                correlation_id = %correlation_id,
                client = %addr,
                method = %method,
                path = %uri.path(),
                error = %e,
                "proxy request failed"
            );
            e.into_response()
        }
    }
}

async fn proxy_request(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    req_headers: &HeaderMap,
    body: Bytes,
    correlation_id: &str,
) -> Result<hyper::Response<hyper::body::Incoming>, ProxyError> {
    let decision = state.routes.route(uri.path(), uri.query());

    tracing::info!(
        correlation_id = %correlation_id,
        method = %method,
        path = %uri.path(),
        rule = decision.rule,
        upstream = %decision.host,
        body_bytes = body.len(),
        "request received"
    );

    let forwarded = headers::forwarded_request_headers(req_headers);
    let region = state.config.region_for(&decision.host);
    let signed = state.signer.sign(
        &SigningRequest {
            method,
            host: &decision.host,
            path: &decision.path,
            query: decision.query.as_deref(),
            headers: &forwarded,
            body: &body,
        },
        &region,
        chrono::Utc::now(),
    )?;

    tracing::debug!(
        correlation_id = %correlation_id,
        path_and_query = %signed.path_and_query,
        region = %region,
        service = state.signer.service(),
        "request signed"
    );

    forward::send(
        &state.http_client,
        state.config.protocol,
        &decision.host,
        signed,
    )
    .await
}
