//! # Credential Error Types
//!
//! [`VcError`] is the single outcome type of issuance and verification.
//! Each failure has its own variant so callers can tell `Revoked` from
//! `Expired` from `SignatureInvalid` without parsing messages.

use dvc_core::CanonicalizationError;
use dvc_crypto::CryptoError;
use dvc_did::DidError;
use dvc_status::RevocationError;
use thiserror::Error;

/// Errors from VC/VP creation, verification, and revocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VcError {
    /// The input does not have the shape of a credential or presentation.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The payload nests deeper than the canonicalizer allows.
    #[error("circular reference: nesting exceeds {max_depth} levels")]
    CircularReference { max_depth: usize },

    /// A credential or presentation carries no proof.
    #[error("proof missing on credential issued by {issuer}")]
    ProofMissing { issuer: String },

    /// The signature does not verify against the resolved key.
    #[error("signature invalid for verification method {verification_method}")]
    SignatureInvalid { verification_method: String },

    /// The issuer's DID could not be resolved.
    #[error("issuer {issuer} could not be resolved: {reason}")]
    UnresolvableIssuer { issuer: String, reason: String },

    /// No verification method with the proof's id in the resolved document.
    #[error("verification method {verification_method} not found")]
    KeyNotFound { verification_method: String },

    /// Key material is malformed or does not fit the algorithm.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// The signing backend failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// `expirationDate` is in the past.
    #[error("credential expired at {expired_at}")]
    Expired { expired_at: String },

    /// `issuanceDate` is in the future.
    #[error("credential not valid before {valid_from}")]
    NotYetValid { valid_from: String },

    /// The credential's bit is set in its issuer's revocation bitmap.
    #[error("credential revoked by {issuer} (index {index})")]
    Revoked { issuer: String, index: u32 },

    /// The issuer's document has no service matching `credentialStatus.id`.
    #[error("revocation service '{service_id}' not found")]
    RevocationServiceNotFound { service_id: String },

    /// The parent credential's subject is not the child's issuer.
    #[error("parent credential subject {parent_subject} is not the issuer {issuer}")]
    ParentInvalid { issuer: String, parent_subject: String },

    /// A delegated claim is not contained in the delegator's claims.
    #[error("claim '{claim}' exceeds the delegator's scope")]
    ScopeViolation { claim: String },

    /// The delegation chain is longer than the configured maximum.
    #[error("delegation chain exceeds {max_depth} credentials")]
    ChainTooDeep { max_depth: usize },

    /// No DID method is registered for the issuer's method.
    #[error("unknown DID method: {0}")]
    UnknownDidMethod(String),

    /// DID resolution timed out.
    #[error("resolution of {did} timed out after {timeout_ms} ms")]
    ResolutionTimeout { did: String, timeout_ms: u64 },

    /// The issuer's DID method does not support the operation.
    #[error("DID method '{method}' does not implement {operation}")]
    NotImplemented {
        method: String,
        operation: &'static str,
    },

    /// The presentation's challenge differs from the expected nonce.
    #[error("challenge mismatch: expected {expected:?}, got {actual:?}")]
    ChallengeMismatch { expected: String, actual: String },

    /// A proof was made for a different purpose than the one being checked.
    #[error("proof purpose mismatch: expected {expected}, got {actual}")]
    ProofPurposeMismatch { expected: String, actual: String },

    /// A presented credential's subject is not the presentation holder.
    #[error("credential subject {subject} is not the holder {holder}")]
    HolderMismatch { holder: String, subject: String },

    /// Any other DID method failure surfaced by revocation.
    #[error("DID method error: {0}")]
    Did(DidError),
}

impl From<CanonicalizationError> for VcError {
    fn from(err: CanonicalizationError) -> Self {
        match err {
            CanonicalizationError::CircularReference { max_depth } => {
                Self::CircularReference { max_depth }
            }
            other => Self::MalformedInput(other.to_string()),
        }
    }
}

impl From<CryptoError> for VcError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::SigningFailed(reason) => Self::SigningFailed(reason),
            other => Self::InvalidKeyMaterial(other.to_string()),
        }
    }
}

impl From<DidError> for VcError {
    fn from(err: DidError) -> Self {
        match err {
            DidError::UnknownDidMethod(method) => Self::UnknownDidMethod(method),
            DidError::ResolutionTimeout { did, timeout_ms } => {
                Self::ResolutionTimeout { did, timeout_ms }
            }
            DidError::NotImplemented { method, operation } => {
                Self::NotImplemented { method, operation }
            }
            DidError::InvalidDid(reason) => Self::MalformedInput(reason),
            DidError::InvalidKey(reason) => Self::InvalidKeyMaterial(reason),
            other => Self::Did(other),
        }
    }
}

impl From<RevocationError> for VcError {
    fn from(err: RevocationError) -> Self {
        match err {
            RevocationError::RevocationServiceNotFound { service_id } => {
                Self::RevocationServiceNotFound { service_id }
            }
            other => Self::MalformedInput(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for VcError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}
