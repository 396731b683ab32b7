//! imaging-proxy is a SigV4-signing reverse proxy for AWS HealthImaging.
//!
//! It receives HTTP requests, picks an upstream host by path, rewrites
//! DICOMweb query parameters to the casing the API expects, signs the
//! request for the `medical-imaging` service, and streams the upstream
//! response back without buffering it.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`config`] -- Immutable runtime configuration and startup checks.
//! - [`cors`] -- Static CORS preflight responses.
//! - [`error`] -- Unified error type using `thiserror`.
//! - [`health`] -- `/health` endpoint handler.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Routing, query rewriting, SigV4 signing, forwarding and
//!   streaming relay.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod cors;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
