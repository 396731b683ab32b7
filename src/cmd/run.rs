//! `imaging-proxy run`: start the proxy server.
//!
//! Builds the immutable configuration from flags and environment, logs
//! any configuration warnings (without stopping), and serves until
//! Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::model::ProxyConfig;
use crate::config::validation;
use crate::error::ProxyError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), ProxyError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let config = ProxyConfig::from_args(&args);

    // Misconfiguration surfaces per request as a 500; the server still starts.
    for warning in validation::validate(&config) {
        tracing::warn!(field = warning.field, "{warning}");
    }

    let state = Arc::new(AppState::new(config, server::build_http_client()));
    let router = server::build_router(Arc::clone(&state), args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        upstream = %state.config.default_host,
        studies_upstream = %state.config.studies_host,
        protocol = %state.config.protocol,
        credentials = state.signer.has_credentials(),
        max_body = args.max_body,
        "imaging-proxy started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("imaging-proxy stopped");
    Ok(())
}
