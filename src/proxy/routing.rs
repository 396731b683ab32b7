//! Ordered routing rules for selecting the upstream host.
//!
//! A [`RoutingTable`] holds rules evaluated in order; the first whose
//! matcher accepts the inbound path wins, and a default rule catches
//! everything else. Each rule names its upstream and an optional
//! [`Rewrite`] applied to the query string before signing.
//!
//! Matching is substring based: any path containing `/studies/` goes to
//! the DICOMweb host, wherever the segment appears.

use super::rewrite::{self, Rewrite};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// Matches when the path contains the literal substring.
    Contains(&'static str),
    /// Matches every path.
    Any,
}

impl PathMatcher {
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Contains(needle) => path.contains(needle),
            Self::Any => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteRule {
    pub name: &'static str,
    pub matcher: PathMatcher,
    pub host: String,
    pub rewrite: Option<Rewrite>,
}

/// Where a single inbound request goes. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub rule: &'static str,
    pub host: String,
    pub path: String,
    pub query: Option<String>,
}

impl RoutingDecision {
    /// The path and (possibly rewritten) query as sent upstream.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoutingTable {
    rules: Vec<RouteRule>,
    fallback: RouteRule,
}

impl RoutingTable {
    #[must_use]
    pub fn new(rules: Vec<RouteRule>, default_host: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: RouteRule {
                name: "default",
                matcher: PathMatcher::Any,
                host: default_host.into(),
                rewrite: None,
            },
        }
    }

    /// The HealthImaging table: DICOMweb `/studies/` traffic to the
    /// imaging-data host with `ImageSetID` renamed, everything else to
    /// the default runtime host untouched.
    #[must_use]
    pub fn medical_imaging(default_host: &str, studies_host: &str) -> Self {
        Self::new(
            vec![RouteRule {
                name: "studies",
                matcher: PathMatcher::Contains("/studies/"),
                host: studies_host.to_string(),
                rewrite: Some(Rewrite::ImageSetId),
            }],
            default_host,
        )
    }

    #[must_use]
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    #[must_use]
    pub fn route(&self, path: &str, query: Option<&str>) -> RoutingDecision {
        let rule = self
            .rules
            .iter()
            .find(|r| r.matcher.matches(path))
            .unwrap_or(&self.fallback);

        let query = match (rule.rewrite, query) {
            (Some(rw), Some(q)) => Some(rewrite::apply(rw, q)),
            (_, q) => q.map(String::from),
        };

        RoutingDecision {
            rule: rule.name,
            host: rule.host.clone(),
            path: path.to_string(),
            query,
        }
    }
}
