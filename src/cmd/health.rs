//! `imaging-proxy health`: check a running instance.
//!
//! Uses the same pooled rustls client as the proxy, so both `http://` and
//! `https://` instances can be checked. Exits non-zero when the instance
//! is unreachable, answers with a non-2xx status, or reports a status
//! other than `ok`.

use std::time::Duration;

use bytes::Bytes;
use http::Uri;
use http_body_util::{BodyExt, Full};

use crate::cli::HealthArgs;
use crate::error::ProxyError;
use crate::health::HealthResponse;
use crate::server::{build_http_client, HttpClient};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), ProxyError> {
    let uri = health_uri(&args.url)?;
    let body = fetch(&build_http_client(), uri, HEALTH_TIMEOUT).await?;

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    let health: HealthResponse =
        serde_json::from_slice(&body).map_err(|e| ProxyError::HttpRequest {
            source: Box::new(e),
        })?;
    println!("{}", render(&health, &args.url));

    if health.status == "ok" {
        Ok(())
    } else {
        Err(ProxyError::Unhealthy(health.status))
    }
}

fn health_uri(base: &str) -> Result<Uri, ProxyError> {
    let uri = format!("{}/health", base.trim_end_matches('/'))
        .parse::<Uri>()
        .map_err(|e| ProxyError::UriParse {
            source: Box::new(e),
        })?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(ProxyError::UriParse {
            source: format!("'{base}' needs a scheme and host, e.g. http://localhost:8089").into(),
        });
    }
    Ok(uri)
}

/// GET `uri` and return the body of a 2xx response.
async fn fetch(client: &HttpClient, uri: Uri, timeout: Duration) -> Result<Bytes, ProxyError> {
    let req = hyper::Request::get(uri)
        .body(Full::default())
        .map_err(|e| ProxyError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(timeout, client.request(req))
        .await
        .map_err(|_| ProxyError::HttpRequest {
            source: format!("no response within {}s", timeout.as_secs()).into(),
        })?
        .map_err(|e| ProxyError::Upstream {
            source: Box::new(e),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::HealthCheckFailed(status));
    }

    Ok(response
        .into_body()
        .collect()
        .await
        .map_err(|e| ProxyError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes())
}

fn render(health: &HealthResponse, url: &str) -> String {
    let mark = if health.status == "ok" { '\u{2713}' } else { '\u{2717}' };
    format!(
        "{mark} imaging-proxy is {} ({url})\n  uptime: {}",
        health.status,
        format_uptime(health.uptime)
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn format_uptime(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u64;
    match (seconds / 3600, (seconds % 3600) / 60, seconds % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, m, s) => format!("{h}h {m}m {s}s"),
    }
}
