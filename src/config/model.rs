//! Immutable runtime configuration.
//!
//! [`ProxyConfig`] is built once from the CLI / environment and shared
//! read-only by every request. [`Credentials`] hides its secrets from
//! `Debug` output so the config can be logged safely.

use std::fmt;

use clap::ValueEnum;

/// Fallback signing region when none is configured or inferable.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Service name in the SigV4 credential scope.
pub const SERVICE_NAME: &str = "medical-imaging";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static long-lived AWS credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    /// Build credentials from optional env values.
    ///
    /// Returns `None` unless both the key id and secret are present and
    /// non-empty; an empty session token is treated as absent.
    #[must_use]
    pub fn from_parts(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        session_token: Option<String>,
    ) -> Option<Self> {
        let access_key_id = access_key_id.filter(|s| !s.trim().is_empty())?;
        let secret_access_key = secret_access_key.filter(|s| !s.trim().is_empty())?;
        Some(Self {
            access_key_id,
            secret_access_key,
            session_token: session_token.filter(|s| !s.trim().is_empty()),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Upstream for every request not matched by a more specific rule.
    pub default_host: String,
    /// Upstream for DICOMweb `/studies/` requests.
    pub studies_host: String,
    pub protocol: Protocol,
    /// Explicit signing region; inferred per host when `None`.
    pub region: Option<String>,
    pub credentials: Option<Credentials>,
}

impl ProxyConfig {
    /// Signing region for a request addressed to `host`.
    #[must_use]
    pub fn region_for(&self, host: &str) -> String {
        self.region
            .clone()
            .filter(|r| !r.is_empty())
            .or_else(|| super::validation::infer_region(host))
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(region: Option<&str>) -> ProxyConfig {
        ProxyConfig {
            default_host: "runtime-medical-imaging.eu-west-1.amazonaws.com".into(),
            studies_host: "dicom-medical-imaging.eu-west-1.amazonaws.com".into(),
            protocol: Protocol::Https,
            region: region.map(String::from),
            credentials: None,
        }
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials::from_parts(
            Some("AKIDEXAMPLE".into()),
            Some("super-secret".into()),
            Some("token-value".into()),
        )
        .unwrap();
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("token-value"));
    }

    #[test]
    fn partial_credentials_are_absent() {
        assert!(Credentials::from_parts(Some("AKID".into()), None, None).is_none());
        assert!(Credentials::from_parts(None, Some("secret".into()), None).is_none());
        assert!(Credentials::from_parts(Some(String::new()), Some("secret".into()), None).is_none());
    }

    #[test]
    fn empty_session_token_is_dropped() {
        let creds =
            Credentials::from_parts(Some("AKID".into()), Some("secret".into()), Some(String::new()))
                .unwrap();
        assert!(creds.session_token.is_none());
    }

    #[test]
    fn explicit_region_wins() {
        let cfg = config(Some("ap-southeast-2"));
        assert_eq!(cfg.region_for(&cfg.default_host), "ap-southeast-2");
    }

    #[test]
    fn region_inferred_from_host() {
        let cfg = config(None);
        assert_eq!(cfg.region_for(&cfg.studies_host), "eu-west-1");
        assert_eq!(cfg.region_for("localhost:4566"), DEFAULT_REGION);
    }
}
