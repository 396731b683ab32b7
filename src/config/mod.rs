//! Configuration loading and validation.
//!
//! Configuration is environment-sourced: `main` loads `.env` with
//! `dotenvy`, clap resolves flags and env vars into
//! [`RunArgs`](crate::cli::RunArgs), and [`ProxyConfig::from_args`]
//! turns them into the immutable value every request reads.

pub mod model;
pub mod validation;

use crate::cli::RunArgs;
use model::{Credentials, ProxyConfig};

impl ProxyConfig {
    #[must_use]
    pub fn from_args(args: &RunArgs) -> Self {
        Self {
            default_host: args.upstream_host.trim().to_string(),
            studies_host: args.studies_host.trim().to_string(),
            protocol: args.protocol,
            region: args
                .region
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from),
            credentials: Credentials::from_parts(
                args.access_key_id.clone(),
                args.secret_access_key.clone(),
                args.session_token.clone(),
            ),
        }
    }
}
