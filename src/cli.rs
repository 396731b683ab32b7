//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, health), and their associated argument structs.
//! Every flag has an environment variable equivalent; `main` loads a
//! `.env` file first so local setups can keep credentials there.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::model::Protocol;

pub const DEFAULT_UPSTREAM_HOST: &str = "runtime-medical-imaging.us-east-1.amazonaws.com";
pub const DEFAULT_STUDIES_HOST: &str = "dicom-medical-imaging.us-east-1.amazonaws.com";

#[derive(Parser)]
#[command(
    name = "imaging-proxy",
    version,
    about = "SigV4-signing streaming reverse proxy for AWS HealthImaging",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        imaging-proxy run                    Start on :8089 using AWS_* env vars\n  \
        imaging-proxy run -p 9000 --pretty   Local dev mode\n  \
        imaging-proxy health                 Check a running instance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Run(Box<RunArgs>),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        imaging-proxy run                                   Defaults from env / .env\n  \
        imaging-proxy run --upstream-host localhost:4566 --protocol http\n  \
        imaging-proxy run --region eu-west-1 --json          Explicit region, JSON logs")]
pub struct RunArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8089)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Upstream --
    /// Default upstream host (authority only, no scheme)
    #[arg(
        long,
        env = "AWS_HOST",
        default_value = DEFAULT_UPSTREAM_HOST,
        help_heading = "Upstream"
    )]
    pub upstream_host: String,

    /// Upstream host for DICOMweb `/studies/` requests
    #[arg(
        long,
        env = "AWS_STUDIES_HOST",
        default_value = DEFAULT_STUDIES_HOST,
        help_heading = "Upstream"
    )]
    pub studies_host: String,

    /// Upstream protocol
    #[arg(
        long,
        env = "AWS_PROTOCOL",
        default_value = "https",
        help_heading = "Upstream"
    )]
    pub protocol: Protocol,

    /// Signing region (inferred from the upstream host when omitted)
    #[arg(long, env = "AWS_REGION", help_heading = "Upstream")]
    pub region: Option<String>,

    // -- Credentials (env only, never on the command line) --
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide = true, hide_env_values = true)]
    pub access_key_id: Option<String>,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide = true, hide_env_values = true)]
    pub secret_access_key: Option<String>,

    #[arg(long, env = "AWS_SESSION_TOKEN", hide = true, hide_env_values = true)]
    pub session_token: Option<String>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max inbound request body size in bytes (bodies are buffered for signing)
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8089")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}
