//! # Cryptographic Error Types
//!
//! Structured errors for the crypto provider boundary.

use thiserror::Error;

/// Errors from signing, verification, and key handling.
///
/// A signature that simply does not verify is *not* an error: providers
/// report it as `Ok(false)`. Errors mean the inputs could not be used at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The key is malformed or inconsistent with the requested algorithm
    /// (wrong `kty`/`crv`, bad coordinates, missing private component).
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Base64url decoding failed.
    #[error("base64url decode error: {0}")]
    Encoding(String),

    /// The backend refused to sign.
    #[error("signing failed: {0}")]
    SigningFailed(String),
}
