//! Structured logging setup using the `tracing` ecosystem.
//!
//! Configures a `tracing-subscriber` with either JSON output (for
//! production) or pretty-printed output (for TTY / local dev). Format
//! is auto-detected from the terminal but can be forced via `--json`
//! or `--pretty`. Connection-level crates are capped at `WARN` so
//! `--log-level debug` shows the proxy's own decisions, not TLS chatter.

use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogLevel;

const NOISY_TARGETS: &[&str] = &["hyper", "hyper_util", "hyper_rustls", "rustls"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[must_use]
pub fn resolve_format(pretty: bool, json: bool) -> LogFormat {
    if json {
        LogFormat::Json
    } else if pretty || std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[must_use]
pub fn filter(level: Level) -> Targets {
    // `Level` orders verbose levels higher, so `min` picks the quieter one.
    let capped = level.min(Level::WARN);
    NOISY_TARGETS
        .iter()
        .fold(Targets::new().with_default(level), |targets, name| {
            targets.with_target(*name, capped)
        })
}

pub fn init(level: &LogLevel, format: LogFormat) {
    let filter = filter(level.to_tracing_level());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(false))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_wins() {
        assert_eq!(resolve_format(false, true), LogFormat::Json);
        assert_eq!(resolve_format(true, false), LogFormat::Pretty);
    }

    #[test]
    fn noisy_targets_are_capped() {
        let targets = filter(Level::DEBUG);
        assert!(targets.would_enable("imaging_proxy::proxy", &Level::DEBUG));
        assert!(!targets.would_enable("rustls::client", &Level::DEBUG));
        assert!(targets.would_enable("rustls::client", &Level::WARN));
    }

    #[test]
    fn quiet_levels_stay_quiet() {
        let targets = filter(Level::ERROR);
        assert!(!targets.would_enable("hyper_util::client", &Level::WARN));
    }
}
