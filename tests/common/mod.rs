//! Shared helpers: a recording mock upstream and a proxy bound to it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::sync::{oneshot, Mutex};

use imaging_proxy::config::model::{Credentials, Protocol, ProxyConfig};
use imaging_proxy::server::{self, AppState};

pub const ACCESS_KEY_ID: &str = "AKIDEXAMPLE";
pub const SECRET_ACCESS_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type RequestLog = Arc<Mutex<Vec<Recorded>>>;

pub struct Upstream {
    pub addr: SocketAddr,
    pub log: RequestLog,
    _shutdown: oneshot::Sender<()>,
}

impl Upstream {
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.log.lock().await.clone()
    }
}

async fn record(
    State(log): State<RequestLog>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    log.lock().await.push(Recorded {
        method,
        uri,
        headers,
        body,
    });

    match path.as_str() {
        "/missing" => (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/json")],
            r#"{"message":"not found"}"#,
        )
            .into_response(),
        "/no-content-type" => Response::new(Body::from("data: hello\n\n")),
        _ => (
            StatusCode::OK,
            [(CONTENT_TYPE, "application/json")],
            r#"{"upstream":"ok"}"#,
        )
            .into_response(),
    }
}

pub async fn serve(router: Router) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });

    (addr, shutdown_tx)
}

/// A mock upstream that records every request it receives.
pub async fn start_upstream() -> Upstream {
    let log = RequestLog::default();
    let router = Router::new()
        .fallback(record)
        .layer(DefaultBodyLimit::disable())
        .with_state(Arc::clone(&log));
    let (addr, shutdown) = serve(router).await;
    Upstream {
        addr,
        log,
        _shutdown: shutdown,
    }
}

pub fn credentials() -> Option<Credentials> {
    Credentials::from_parts(
        Some(ACCESS_KEY_ID.into()),
        Some(SECRET_ACCESS_KEY.into()),
        None,
    )
}

pub fn config(default_host: &str, studies_host: &str, creds: Option<Credentials>) -> ProxyConfig {
    ProxyConfig {
        default_host: default_host.into(),
        studies_host: studies_host.into(),
        protocol: Protocol::Http,
        region: None,
        credentials: creds,
    }
}

pub async fn start_proxy(config: ProxyConfig, max_body: usize) -> (SocketAddr, oneshot::Sender<()>) {
    let state = Arc::new(AppState::new(config, server::build_http_client()));
    serve(server::build_router(state, max_body)).await
}
