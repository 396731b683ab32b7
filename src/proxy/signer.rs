//! AWS Signature Version 4 request signing.
//!
//! [`Signer::sign`] turns a routed request into the request sent
//! upstream: the routed path and query exactly as given, plus `host` /
//! `x-amz-date` / `x-amz-security-token` headers and the `authorization`
//! header. The normalized path and sorted query only feed the signature;
//! the upstream derives the same canonical form from the wire request.
//!
//! The inbound body is hashed in full before any header can be built,
//! which is why the proxy buffers request bodies.

use std::collections::BTreeMap;

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{
    percent_decode_str, percent_encode, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC,
};
use sha2::{Digest, Sha256};
use url::form_urlencoded;

use crate::config::model::Credentials;
use crate::config::validation::validate_host;
use crate::error::ProxyError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SCOPE_TERMINATOR: &str = "aws4_request";

/// Used when a body is sent without a caller-supplied `content-type`.
pub const DEFAULT_BODY_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// RFC 3986 unreserved characters stay as-is, everything else is encoded.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A routed request, ready to be signed.
#[derive(Debug)]
pub struct SigningRequest<'a> {
    pub method: &'a Method,
    pub host: &'a str,
    pub path: &'a str,
    pub query: Option<&'a str>,
    /// End-to-end headers to forward and sign (already filtered).
    pub headers: &'a HeaderMap,
    pub body: &'a Bytes,
}

/// The signed envelope: everything needed to issue the upstream call.
#[derive(Debug)]
pub struct SignedRequest {
    pub method: Method,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug)]
struct CanonicalRequest {
    headers: BTreeMap<String, String>,
    signed_headers: String,
    text: String,
}

#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Option<Credentials>,
    service: &'static str,
}

impl Signer {
    #[must_use]
    pub const fn new(credentials: Option<Credentials>, service: &'static str) -> Self {
        Self {
            credentials,
            service,
        }
    }

    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    #[must_use]
    pub const fn service(&self) -> &'static str {
        self.service
    }

    pub fn sign(
        &self,
        req: &SigningRequest<'_>,
        region: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedRequest, ProxyError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(ProxyError::MissingCredentials)?;

        validate_host(req.host).map_err(|reason| ProxyError::InvalidUpstream {
            host: req.host.to_string(),
            reason,
        })?;

        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();

        let canonical = canonical_request(req, &amz_date, creds.session_token.as_deref())?;
        let scope = format!("{date}/{region}/{}/{SCOPE_TERMINATOR}", self.service);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical.text.as_bytes())
        );
        let key = signing_key(&creds.secret_access_key, &date, region, self.service)?;
        let signature = format!("{:x}", hmac(&key, string_to_sign.as_bytes())?);

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
            creds.access_key_id, canonical.signed_headers
        );

        let mut headers = HeaderMap::with_capacity(canonical.headers.len() + 1);
        for (name, value) in &canonical.headers {
            headers.insert(header_name(name)?, header_value(value)?);
        }
        headers.insert(
            axum::http::header::AUTHORIZATION,
            header_value(&authorization)?,
        );

        let path_and_query = match req.query {
            Some(query) => format!("{}?{query}", req.path),
            None => req.path.to_string(),
        };

        Ok(SignedRequest {
            method: req.method.clone(),
            path_and_query,
            headers,
            body: req.body.clone(),
        })
    }
}

fn canonical_request(
    req: &SigningRequest<'_>,
    amz_date: &str,
    session_token: Option<&str>,
) -> Result<CanonicalRequest, ProxyError> {
    let path = normalize_path(req.path);
    let query = canonical_query(req.query);

    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in req.headers {
        let value = value.to_str().map_err(|e| ProxyError::InvalidHeader {
            source: Box::new(e),
        })?;
        let value = collapse_whitespace(value);
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    if !req.body.is_empty() && !headers.contains_key("content-type") {
        headers.insert("content-type".into(), DEFAULT_BODY_CONTENT_TYPE.into());
    }
    headers.insert("host".into(), req.host.to_string());
    headers.insert("x-amz-date".into(), amz_date.to_string());
    if let Some(token) = session_token {
        headers.insert("x-amz-security-token".into(), token.to_string());
    }

    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{k}:{v}\n"))
        .collect();
    let signed_headers = headers.keys().map(String::as_str).collect::<Vec<_>>().join(";");

    // Non-S3 services sign the already-encoded path encoded once more.
    let canonical_uri = path
        .split('/')
        .map(|seg| utf8_percent_encode(seg, UNRESERVED).to_string())
        .collect::<Vec<_>>()
        .join("/");

    let payload_hash = sha256_hex(req.body);
    let text = [
        req.method.as_str(),
        canonical_uri.as_str(),
        query.as_str(),
        canonical_headers.as_str(),
        signed_headers.as_str(),
        payload_hash.as_str(),
    ]
    .join("\n");

    Ok(CanonicalRequest {
        headers,
        signed_headers,
        text,
    })
}

/// Remove dot segments and empty segments, then re-encode each segment.
///
/// A trailing slash survives; an empty result becomes `/`.
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    for raw in path.split('/') {
        let decoded: Vec<u8> = percent_decode_str(raw).collect();
        match decoded.as_slice() {
            b"" | b"." => {}
            b".." => {
                segments.pop();
            }
            seg => segments.push(percent_encode(seg, UNRESERVED).to_string()),
        }
    }

    let mut out = String::with_capacity(path.len() + 1);
    for seg in &segments {
        out.push('/');
        out.push_str(seg);
    }
    let trailing = path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..");
    if out.is_empty() || trailing {
        out.push('/');
    }
    out
}

/// Decode, RFC 3986 encode, and sort query parameters by name then value.
fn canonical_query(query: Option<&str>) -> String {
    let Some(query) = query else {
        return String::new();
    };
    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| {
            (
                utf8_percent_encode(&k, UNRESERVED).to_string(),
                utf8_percent_encode(&v, UNRESERVED).to_string(),
            )
        })
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, ProxyError> {
    let k_date = hmac(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac(&k_date, region.as_bytes())?;
    let k_service = hmac(&k_region, service.as_bytes())?;
    Ok(hmac(&k_service, SCOPE_TERMINATOR.as_bytes())?.to_vec())
}

fn hmac(key: &[u8], data: &[u8]) -> Result<hmac::digest::Output<HmacSha256>, ProxyError> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes())
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn header_name(name: &str) -> Result<HeaderName, ProxyError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| ProxyError::InvalidHeader {
        source: Box::new(e),
    })
}

fn header_value(value: &str) -> Result<HeaderValue, ProxyError> {
    HeaderValue::from_str(value).map_err(|e| ProxyError::InvalidHeader {
        source: Box::new(e),
    })
}
