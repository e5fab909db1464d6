//! # Verifiable Credential
//!
//! The W3C VC envelope with an optional embedded parent credential under
//! `credentialSubject.parentVC`, which is how delegation chains travel.
//!
//! ## Security Invariants
//!
//! - The signing input is the canonical form of the credential with the
//!   top-level `proof` removed, built through [`CanonicalBytes`]. An
//!   embedded parent keeps its own proof and is signed over verbatim.
//!
//! - The envelope is rigid (`deny_unknown_fields`): a member this type
//!   cannot carry would be dropped on re-serialization and silently change
//!   the signed bytes, so it is rejected as malformed instead.
//!
//! - `credentialSubject` is open: claims are flattened and kept in order.

use dvc_core::{CanonicalBytes, Did, WireTimestamp};
use dvc_status::CredentialStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::VcError;
use crate::proof::Proof;

/// Base context of every credential and presentation.
pub const VC_CONTEXT_V1: &str = "https://www.w3.org/2018/credentials/v1";

/// Base type of every credential.
pub const VERIFIABLE_CREDENTIAL: &str = "VerifiableCredential";

/// Type appended to credentials issued under delegation.
pub const DELEGATED_CREDENTIAL: &str = "DelegatedCredential";

/// Members of `credentialSubject` that are structure, not claims.
pub(crate) const RESERVED_SUBJECT_KEYS: [&str; 2] = ["id", "parentVC"];

/// A W3C Verifiable Credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifiableCredential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    pub issuer: Did,

    /// Convenience copy of `credentialSubject.id`, signed with the rest.
    pub subject: Did,

    #[serde(rename = "issuanceDate")]
    pub issuance_date: WireTimestamp,

    #[serde(
        rename = "expirationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<WireTimestamp>,

    #[serde(rename = "credentialSubject")]
    pub credential_subject: CredentialSubject,

    #[serde(
        rename = "credentialStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub credential_status: Option<CredentialStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

/// The subject of a credential: its DID, its claims, and for a delegated
/// credential the parent that authorized it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubject {
    pub id: Did,

    #[serde(rename = "parentVC", default, skip_serializing_if = "Option::is_none")]
    pub parent_vc: Option<Box<VerifiableCredential>>,

    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl CredentialSubject {
    pub fn new(id: Did, claims: Map<String, Value>) -> Self {
        Self {
            id,
            parent_vc: None,
            claims,
        }
    }
}

impl VerifiableCredential {
    /// Canonical bytes of the credential without its `proof`.
    pub fn signing_input(&self) -> Result<CanonicalBytes, VcError> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("proof");
        }
        Ok(CanonicalBytes::from_value(value)?)
    }

    /// The embedded parent credential, if this one was delegated.
    pub fn parent(&self) -> Option<&VerifiableCredential> {
        self.credential_subject.parent_vc.as_deref()
    }

    pub fn is_delegated(&self) -> bool {
        self.parent().is_some()
    }

    /// A claim from `credentialSubject`.
    pub fn claim(&self, key: &str) -> Option<&Value> {
        self.credential_subject.claims.get(key)
    }

    /// Parse a credential from JSON text.
    pub fn from_json(json: &str) -> Result<Self, VcError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Reject claim maps that try to set structural subject members.
pub(crate) fn ensure_plain_claims(claims: &Map<String, Value>) -> Result<(), VcError> {
    match RESERVED_SUBJECT_KEYS.iter().find(|k| claims.contains_key(**k)) {
        Some(key) => Err(VcError::MalformedInput(format!(
            "'{key}' is reserved in credentialSubject"
        ))),
        None => Ok(()),
    }
}

/// Append the members of `extra` not already in `base`, keeping order.
pub(crate) fn union_dedup(base: &[String], extra: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(base.len() + extra.len());
    for item in base.iter().chain(extra) {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}
