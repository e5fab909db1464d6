//! # DID Documents
//!
//! The structural interface every DID method resolves to:
//! `{id, verificationMethod[], authentication[], assertionMethod[], service[]}`.
//! Members a method adds beyond these are kept verbatim in
//! [`DidDocument::extra`] so a document survives a round trip unchanged.
//!
//! `publicKeyJwk` is held as raw JSON. A document may list key types this
//! system cannot verify with (RSA, P-256, ...); such a key fails only when
//! it is selected by [`VerificationMethod::resolve_jwk`], never the parse of
//! the whole document.

use dvc_crypto::Jwk;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DidError;
use crate::key::decode_ed25519_multibase;

/// W3C DID Core context.
pub const DID_CONTEXT_V1: &str = "https://www.w3.org/ns/did/v1";

/// A resolved DID Document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verification_method: Vec<VerificationMethod>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<VerificationRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<VerificationRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<Service>,
    /// Method-specific members not modeled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A public key entry in a DID Document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub controller: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_multibase: Option<String>,
}

/// An entry of `authentication` or `assertionMethod`: either a reference to
/// a verification method by id, or an embedded method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerificationRelationship {
    Reference(String),
    Embedded(VerificationMethod),
}

/// A service endpoint entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub service_endpoint: Value,
}

impl DidDocument {
    /// An empty document for `id` with the DID Core context.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            context: Some(Value::Array(vec![Value::String(DID_CONTEXT_V1.to_string())])),
            id: id.into(),
            controller: None,
            verification_method: Vec::new(),
            authentication: Vec::new(),
            assertion_method: Vec::new(),
            service: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Find a verification method whose `id` exactly equals `id`.
    ///
    /// Methods embedded in `authentication` and `assertionMethod` are
    /// searched after the top-level `verificationMethod` list.
    pub fn find_verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        self.verification_method
            .iter()
            .chain(embedded(&self.authentication))
            .chain(embedded(&self.assertion_method))
            .find(|vm| vm.id == id)
    }

    /// Find a service entry by `id`.
    pub fn find_service(&self, id: &str) -> Option<&Service> {
        self.service.iter().find(|s| s.id == id)
    }

    /// Insert or replace the service entry with the same `id`.
    pub fn upsert_service(&mut self, service: Service) {
        match self.service.iter_mut().find(|s| s.id == service.id) {
            Some(existing) => *existing = service,
            None => self.service.push(service),
        }
    }
}

fn embedded(rels: &[VerificationRelationship]) -> impl Iterator<Item = &VerificationMethod> {
    rels.iter().filter_map(|r| match r {
        VerificationRelationship::Embedded(vm) => Some(vm),
        VerificationRelationship::Reference(_) => None,
    })
}

impl VerificationMethod {
    /// A `JsonWebKey2020` method carrying the public half of `key`.
    pub fn json_web_key(
        id: impl Into<String>,
        controller: impl Into<String>,
        key: &Jwk,
    ) -> Result<Self, DidError> {
        let jwk = serde_json::to_value(key.public()).map_err(|e| DidError::InvalidKey(e.to_string()))?;
        Ok(Self {
            id: id.into(),
            type_: "JsonWebKey2020".to_string(),
            controller: controller.into(),
            public_key_jwk: Some(jwk),
            public_key_multibase: None,
        })
    }

    /// The method's public key as a JWK.
    ///
    /// Returns `publicKeyJwk` when present. Otherwise a did:key-style
    /// Ed25519 `publicKeyMultibase` is converted to an OKP JWK.
    ///
    /// # Errors
    ///
    /// [`DidError::InvalidKey`] when the key is absent, malformed, or of a
    /// type no provider here verifies with.
    pub fn resolve_jwk(&self) -> Result<Jwk, DidError> {
        if let Some(raw) = &self.public_key_jwk {
            let jwk: Jwk = serde_json::from_value(raw.clone()).map_err(|e| {
                DidError::InvalidKey(format!("verification method {}: {e}", self.id))
            })?;
            jwk.algorithm()
                .map_err(|e| DidError::InvalidKey(format!("verification method {}: {e}", self.id)))?;
            return Ok(jwk.public());
        }
        let multibase = self.public_key_multibase.as_deref().ok_or_else(|| {
            DidError::InvalidKey(format!("verification method {} carries no public key", self.id))
        })?;
        let raw = decode_ed25519_multibase(multibase)?;
        Ok(Jwk {
            kty: "OKP".to_string(),
            crv: "Ed25519".to_string(),
            x: dvc_crypto::b64url_encode(&raw),
            y: None,
            d: None,
            kid: Some(self.id.clone()),
            alg: None,
        })
    }
}

impl Service {
    /// The endpoint as a string, when it is one.
    pub fn endpoint_str(&self) -> Option<&str> {
        self.service_endpoint.as_str()
    }
}
