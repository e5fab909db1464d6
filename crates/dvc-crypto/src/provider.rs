//! # Crypto Provider Boundary
//!
//! Credential issuance and verification consume signatures through the
//! [`CryptoProvider`] trait and never call a curve library directly. The
//! engines hold an `Arc<dyn CryptoProvider>`, so a remote signer or HSM
//! backend can replace [`DefaultCryptoProvider`] without touching them.
//!
//! ## Security Invariants
//!
//! - `CryptoProvider` is `Send + Sync` for use across async tasks.
//! - Signing and verification input is `&CanonicalBytes` (never raw bytes).
//! - The key's `kty`/`crv` must match the requested algorithm; otherwise
//!   the call fails with `CryptoError::InvalidKeyMaterial` before any
//!   curve operation runs.

use dvc_core::CanonicalBytes;

use crate::algorithm::Algorithm;
use crate::ed25519::{self, Ed25519KeyPair};
use crate::error::CryptoError;
use crate::jwk::Jwk;
use crate::secp256k1::{self, Secp256k1KeyPair};

/// Sign/verify over canonical bytes with JWK key material.
///
/// The trait is object-safe for use with `Arc<dyn CryptoProvider>`.
pub trait CryptoProvider: Send + Sync {
    /// Sign `data` with the private JWK under `alg`.
    fn sign(&self, data: &CanonicalBytes, key: &Jwk, alg: Algorithm) -> Result<Vec<u8>, CryptoError>;

    /// Verify `signature` over `data` with the public JWK under `alg`.
    ///
    /// `Ok(false)` means the signature does not verify.
    fn verify(
        &self,
        data: &CanonicalBytes,
        signature: &[u8],
        key: &Jwk,
        alg: Algorithm,
    ) -> Result<bool, CryptoError>;

    /// Human-readable name for this provider (for diagnostics/logging).
    fn provider_name(&self) -> &str;
}

// ─── DefaultCryptoProvider ───────────────────────────────────────────────

/// In-process provider backed by `ed25519-dalek` and `k256`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCryptoProvider;

impl DefaultCryptoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CryptoProvider for DefaultCryptoProvider {
    fn sign(&self, data: &CanonicalBytes, key: &Jwk, alg: Algorithm) -> Result<Vec<u8>, CryptoError> {
        key.ensure_algorithm(alg)?;
        let signature = match alg {
            Algorithm::Ed25519 => Ed25519KeyPair::from_jwk(key)?.sign(data).to_vec(),
            Algorithm::Es256k => Secp256k1KeyPair::from_jwk(key)?.sign(data),
        };
        tracing::debug!(alg = %alg, payload_len = data.len(), "signed canonical payload");
        Ok(signature)
    }

    fn verify(
        &self,
        data: &CanonicalBytes,
        signature: &[u8],
        key: &Jwk,
        alg: Algorithm,
    ) -> Result<bool, CryptoError> {
        key.ensure_algorithm(alg)?;
        let valid = match alg {
            Algorithm::Ed25519 => ed25519::verify(data, signature, key)?,
            Algorithm::Es256k => secp256k1::verify(data, signature, key)?,
        };
        if !valid {
            tracing::debug!(alg = %alg, "signature did not verify");
        }
        Ok(valid)
    }

    fn provider_name(&self) -> &str {
        "DefaultCryptoProvider"
    }
}
