//! Configuration checks and host helpers.
//!
//! [`validate`] inspects a [`ProxyConfig`] at startup and returns a list
//! of [`ConfigWarning`]s. Misconfiguration never stops the process: the
//! affected requests fail with a `500` when they are signed or sent.

use std::fmt;

use axum::http::uri::Authority;

use super::model::ProxyConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

/// Check that `host` is a bare authority (`name[:port]`) with no scheme or path.
pub fn validate_host(host: &str) -> Result<(), String> {
    if host.trim().is_empty() {
        return Err("host cannot be empty".into());
    }
    if let Some((scheme, rest)) = host.split_once("://") {
        return Err(format!(
            "host must not include a scheme (did you mean '{rest}' with --protocol {scheme}?)"
        ));
    }
    if host.contains(['/', '?', '#']) {
        return Err("host must not include a path or query".into());
    }
    if host.contains('@') {
        return Err("host must not include user info".into());
    }
    host.parse::<Authority>()
        .map(|_| ())
        .map_err(|e| format!("'{host}' is not a valid authority: {e}"))
}

/// Extract the region from an `<service>.<region>.amazonaws.com[.cn]` host.
#[must_use]
pub fn infer_region(host: &str) -> Option<String> {
    let name = host.rsplit_once(':').map_or(host, |(name, _)| name);
    let name = name
        .strip_suffix(".amazonaws.com")
        .or_else(|| name.strip_suffix(".amazonaws.com.cn"))?;
    let (_, region) = name.rsplit_once('.')?;
    (!region.is_empty()).then(|| region.to_string())
}

#[must_use]
pub fn validate(config: &ProxyConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    for (field, host) in [
        ("upstream_host", &config.default_host),
        ("studies_host", &config.studies_host),
    ] {
        if let Err(message) = validate_host(host) {
            warnings.push(ConfigWarning {
                field,
                message,
                suggestion: Some("requests routed to this host will fail".into()),
            });
        }
    }

    if config.credentials.is_none() {
        warnings.push(ConfigWarning {
            field: "credentials",
            message: "AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY not set".into(),
            suggestion: Some("proxied requests will return 500 until configured".into()),
        });
    }

    if config.region.is_none() {
        let hosts = [&config.default_host, &config.studies_host];
        if hosts.iter().any(|h| infer_region(h).is_none()) {
            warnings.push(ConfigWarning {
                field: "region",
                message: "region not set and not inferable from every upstream host".into(),
                suggestion: Some(format!(
                    "falling back to {}; set AWS_REGION to override",
                    super::model::DEFAULT_REGION
                )),
            });
        }
    }

    warnings
}
