//! # DID Layer Error Types

use dvc_core::ValidationError;
use thiserror::Error;

/// Errors from DID resolution, creation, and revocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DidError {
    /// The identifier is not a well-formed DID.
    #[error("invalid DID: {0}")]
    InvalidDid(String),

    /// No resolver is registered for the DID's method.
    #[error("unknown DID method: {0}")]
    UnknownDidMethod(String),

    /// The DID method does not support the requested operation.
    #[error("DID method '{method}' does not implement {operation}")]
    NotImplemented {
        method: String,
        operation: &'static str,
    },

    /// A resolution exceeded its time budget and was cancelled.
    #[error("resolution of {did} timed out after {timeout_ms} ms")]
    ResolutionTimeout { did: String, timeout_ms: u64 },

    /// Transport-level failure or non-success HTTP status.
    #[error("HTTP error fetching {url}: {reason}")]
    Http { url: String, reason: String },

    /// The method has no document for this DID.
    #[error("DID not found: {0}")]
    NotFound(String),

    /// The fetched or stored document is not a valid DID Document.
    #[error("invalid DID document: {0}")]
    InvalidDocument(String),

    /// The document's `id` differs from the DID that was resolved.
    #[error("DID document id '{actual}' does not match '{expected}'")]
    IdMismatch { expected: String, actual: String },

    /// Key material cannot be expressed in, or recovered from, this method.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Method-specific failure (ledger client, bitmap update, signer check).
    #[error("{method} method error: {reason}")]
    Method { method: String, reason: String },
}

impl From<ValidationError> for DidError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidDid(s) => Self::InvalidDid(s),
            other => Self::InvalidDid(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_maps_to_invalid_did() {
        let err: DidError = ValidationError::InvalidDid("nope".to_string()).into();
        assert_eq!(err, DidError::InvalidDid("nope".to_string()));
    }

    #[test]
    fn timeout_display_includes_budget() {
        let err = DidError::ResolutionTimeout {
            did: "did:web:slow.example".to_string(),
            timeout_ms: 250,
        };
        let msg = err.to_string();
        assert!(msg.contains("did:web:slow.example"));
        assert!(msg.contains("250"));
    }

    #[test]
    fn not_implemented_names_operation() {
        let err = DidError::NotImplemented {
            method: "key".to_string(),
            operation: "revoke",
        };
        assert_eq!(err.to_string(), "DID method 'key' does not implement revoke");
    }
}
