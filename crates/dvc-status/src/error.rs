//! # Revocation Error Types

use thiserror::Error;

/// Errors from credential status handling and bitmap decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevocationError {
    /// `credentialStatus.type` is not `RevocationBitmap2022`.
    #[error("unsupported credential status type: {0}")]
    UnsupportedStatusType(String),

    /// The credential carries no `credentialStatus`.
    #[error("credential has no credentialStatus")]
    MissingCredentialStatus,

    /// `revocationBitmapIndex` is not a non-negative 32-bit integer.
    #[error("invalid revocation bitmap index: {0}")]
    InvalidIndex(String),

    /// The issuer's document has no matching revocation service.
    #[error("revocation service '{service_id}' not found in DID document")]
    RevocationServiceNotFound { service_id: String },

    /// The service endpoint is not a base64 octet-stream data URI.
    #[error("invalid revocation service endpoint: {0}")]
    InvalidEndpoint(String),

    /// Base64, inflate, or bitmap deserialization failed.
    #[error("revocation bitmap decode failed: {0}")]
    Decode(String),

    /// Bitmap serialization or compression failed.
    #[error("revocation bitmap encode failed: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_not_found_names_service() {
        let err = RevocationError::RevocationServiceNotFound {
            service_id: "did:web:example.com#revocation".to_string(),
        };
        assert!(err.to_string().contains("did:web:example.com#revocation"));
    }
}
