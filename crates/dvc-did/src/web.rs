//! # did:web
//!
//! Resolves `did:web:<host>[:<port>][:<segment>...]` by fetching
//! `https://<host>[:<port>]/<segment>/.../did.json`, or
//! `https://<host>[:<port>]/.well-known/did.json` when there are no path
//! segments.
//!
//! ## Derivation Rules
//!
//! - The host segment is percent-decoded only to split off the port, so
//!   `example.com%3A8443` names host `example.com` on port 8443. A decoded
//!   host holding any other URL delimiter (`@`, `/`, `?`, `#`, `\`) is
//!   refused.
//! - An all-digit segment directly after the host is the port.
//! - Path segments are percent-decoded and re-encoded one segment at a
//!   time, so a decoded `/` never adds a path level.
//!
//! ## Fetch Policy
//!
//! Each attempt is bounded by the configured timeout, covering both the
//! request and the body read. A failed `https` attempt is retried exactly
//! once over `http` when fallback is enabled. There is no other retry.
//! Dropping the resolve future cancels the in-flight request.

use std::time::Duration;

use async_trait::async_trait;
use dvc_core::Did;
use dvc_crypto::Jwk;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;
use url::Url;

use crate::config::ResolverConfig;
use crate::document::{DidDocument, VerificationMethod, VerificationRelationship};
use crate::error::DidError;
use crate::key::KEY_FRAGMENT;
use crate::method::{CreateOptions, CreatedDid, DidMethod};

/// Characters escaped when a domain or path segment is written into a
/// did:web identifier.
const SEGMENT: &AsciiSet = &CONTROLS.add(b':').add(b'/').add(b'%').add(b'?').add(b'#').add(b' ');

/// Characters that would move a decoded host into another URL component.
const HOST_DELIMITERS: [char; 7] = ['@', '/', '?', '#', '\\', '%', ':'];

const JWS_2020_CONTEXT: &str = "https://w3id.org/security/suites/jws-2020/v1";

/// Derive the `https` URL of the document for a did:web identifier.
pub fn did_web_url(did: &Did) -> Result<Url, DidError> {
    if did.method() != "web" {
        return Err(DidError::InvalidDid(format!("{did} is not a did:web identifier")));
    }
    let invalid = |reason: &str| DidError::InvalidDid(format!("{did}: {reason}"));
    let mut segments = did.method_specific_id().split(':');
    let authority = decode_segment(did, segments.next().unwrap_or_default())?;
    let (host, mut port) = match authority.split_once(':') {
        Some((host, port)) => (host.to_string(), Some(port.to_string())),
        None => (authority, None),
    };
    if host.is_empty() {
        return Err(DidError::InvalidDid(format!("{did} has an empty host")));
    }
    if host.chars().any(|c| HOST_DELIMITERS.contains(&c) || c.is_whitespace()) {
        return Err(invalid("host contains a URL delimiter"));
    }

    let mut rest: Vec<&str> = segments.collect();
    if port.is_none() {
        if let Some(first) = rest.first() {
            if !first.is_empty() && first.bytes().all(|b| b.is_ascii_digit()) {
                port = Some(first.to_string());
                rest.remove(0);
            }
        }
    }
    let port = port
        .map(|p| p.parse::<u16>().map_err(|_| invalid("port is not a number in range")))
        .transpose()?;

    let mut url = Url::parse(&format!("https://{host}/")).map_err(|e| invalid(&e.to_string()))?;
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("host carries userinfo"));
    }
    url.set_port(port).map_err(|()| invalid("port cannot be set"))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| invalid("URL cannot carry a path"))?;
        path.clear();
        if rest.is_empty() {
            path.extend([".well-known", "did.json"]);
        } else {
            for segment in &rest {
                let decoded = decode_segment(did, segment)?;
                if decoded == "." || decoded == ".." {
                    return Err(invalid("dot path segment"));
                }
                path.push(&decoded);
            }
            path.push("did.json");
        }
    }
    Ok(url)
}

fn decode_segment(did: &Did, segment: &str) -> Result<String, DidError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| DidError::InvalidDid(format!("{did}: {e}")))
}

/// The did:web method.
#[derive(Debug, Clone)]
pub struct DidWebMethod {
    client: reqwest::Client,
    timeout: Duration,
    strict_id: bool,
    http_fallback: bool,
}

impl DidWebMethod {
    /// Build a resolver with its own HTTP client.
    pub fn new(config: &ResolverConfig) -> Result<Self, DidError> {
        let client = reqwest::Client::builder()
            .timeout(config.web_timeout)
            .build()
            .map_err(|e| DidError::Http {
                url: "client_init".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::with_client(client, config))
    }

    /// Build a resolver around a shared HTTP client.
    pub fn with_client(client: reqwest::Client, config: &ResolverConfig) -> Self {
        Self {
            client,
            timeout: config.web_timeout,
            strict_id: config.web_strict_id,
            http_fallback: config.web_http_fallback,
        }
    }

    async fn fetch(&self, did: &Did) -> Result<Value, DidError> {
        let url = did_web_url(did)?;
        match self.fetch_json(did, &url).await {
            Ok(value) => Ok(value),
            Err(err) if self.http_fallback => {
                let mut fallback = url.clone();
                fallback.set_scheme("http").map_err(|()| DidError::Http {
                    url: url.to_string(),
                    reason: "cannot downgrade scheme".to_string(),
                })?;
                tracing::warn!(did = %did, url = %url, error = %err, "https fetch failed, retrying over http");
                self.fetch_json(did, &fallback).await
            }
            Err(err) => Err(err),
        }
    }

    async fn fetch_json(&self, did: &Did, url: &Url) -> Result<Value, DidError> {
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let attempt = async {
            let response = self
                .client
                .get(url.clone())
                .header(reqwest::header::ACCEPT, "application/did+json, application/json")
                .send()
                .await
                .map_err(|e| transport_error(did, url, timeout_ms, e))?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DidError::NotFound(did.to_string()));
            }
            if !status.is_success() {
                return Err(DidError::Http {
                    url: url.to_string(),
                    reason: format!("status {status}"),
                });
            }

            let value = response
                .json::<Value>()
                .await
                .map_err(|e| transport_error(did, url, timeout_ms, e))?;
            Ok::<Value, DidError>(value)
        };

        tracing::debug!(did = %did, url = %url, "fetching did:web document");
        tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| DidError::ResolutionTimeout {
                did: did.to_string(),
                timeout_ms,
            })?
    }

    fn validate(&self, did: &Did, value: Value) -> Result<DidDocument, DidError> {
        let Some(object) = value.as_object() else {
            return Err(DidError::InvalidDocument(format!(
                "{did}: response is not a JSON object"
            )));
        };
        let Some(id) = object.get("id").and_then(Value::as_str) else {
            return Err(DidError::InvalidDocument(format!(
                "{did}: document has no string id"
            )));
        };
        if id != did.as_str() {
            if self.strict_id {
                return Err(DidError::IdMismatch {
                    expected: did.to_string(),
                    actual: id.to_string(),
                });
            }
            tracing::warn!(did = %did, document_id = id, "did:web document id mismatch accepted");
        }
        serde_json::from_value(value).map_err(|e| DidError::InvalidDocument(format!("{did}: {e}")))
    }
}

fn transport_error(did: &Did, url: &Url, timeout_ms: u64, err: reqwest::Error) -> DidError {
    if err.is_timeout() {
        DidError::ResolutionTimeout {
            did: did.to_string(),
            timeout_ms,
        }
    } else if err.is_decode() {
        DidError::InvalidDocument(format!("{did}: {err}"))
    } else {
        DidError::Http {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl DidMethod for DidWebMethod {
    fn method_name(&self) -> &str {
        "web"
    }

    async fn resolve(&self, did: &Did) -> Result<DidDocument, DidError> {
        let value = self.fetch(did).await?;
        self.validate(did, value)
    }

    /// Build the DID and the document the operator must host.
    ///
    /// Nothing is published; the returned document is served by whoever
    /// controls the domain.
    async fn create(&self, public_key: &Jwk, options: &CreateOptions) -> Result<CreatedDid, DidError> {
        let CreateOptions::Web { domain, path } = options else {
            return Err(DidError::Method {
                method: "web".to_string(),
                reason: format!("unexpected options for method '{}'", options.method_name()),
            });
        };
        if domain.trim().is_empty() {
            return Err(DidError::InvalidDid("did:web domain is empty".to_string()));
        }
        public_key
            .algorithm()
            .map_err(|e| DidError::InvalidKey(e.to_string()))?;

        let mut id = format!("did:web:{}", utf8_percent_encode(domain, SEGMENT));
        for segment in path {
            id.push(':');
            id.extend(utf8_percent_encode(segment, SEGMENT));
        }
        let did = Did::new(id)?;

        let vm_id = did.with_fragment(KEY_FRAGMENT);
        let mut document = DidDocument::new(did.as_str());
        document.context = Some(serde_json::json!([
            crate::document::DID_CONTEXT_V1,
            JWS_2020_CONTEXT
        ]));
        document
            .verification_method
            .push(VerificationMethod::json_web_key(vm_id.clone(), did.as_str(), public_key)?);
        document
            .authentication
            .push(VerificationRelationship::Reference(vm_id.clone()));
        document
            .assertion_method
            .push(VerificationRelationship::Reference(vm_id));

        let url = did_web_url(&did)?;
        tracing::info!(did = %did, url = %url, "did:web document ready to publish");
        Ok(CreatedDid { did, document })
    }
}
