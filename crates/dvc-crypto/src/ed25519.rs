//! # Ed25519 Signing and Verification
//!
//! Ed25519 key pairs for credential and presentation proofs.
//!
//! ## Security Invariant
//!
//! - Signing input MUST be `&CanonicalBytes`. Raw bytes cannot be signed,
//!   so every signature covers a JCS-canonical payload.
//! - `Ed25519KeyPair` does not implement `Serialize`. Exporting the private
//!   key requires an explicit [`Ed25519KeyPair::to_jwk()`] call.
//! - A JWK whose `d` does not derive the JWK's `x` is rejected as
//!   `InvalidKeyMaterial` instead of silently signing under another key.

use dvc_core::CanonicalBytes;
use ed25519_dalek::{Signer, Verifier};

use crate::error::CryptoError;
use crate::jwk::{b64url_encode, Jwk};

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 key pair for signing operations.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Ed25519KeyPair {
    /// Generate a new random Ed25519 key pair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Self { signing_key }
    }

    /// Create a key pair from a raw 32-byte private key seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Load a key pair from a private OKP/Ed25519 JWK.
    pub fn from_jwk(jwk: &Jwk) -> Result<Self, CryptoError> {
        let seed = jwk.d_bytes::<32>()?;
        let pair = Self::from_seed(&seed);
        let expected = jwk.x_bytes::<32>()?;
        if pair.public_key_bytes() != expected {
            return Err(CryptoError::InvalidKeyMaterial(
                "Ed25519 private key does not match public key x".to_string(),
            ));
        }
        Ok(pair)
    }

    /// Raw 32-byte public key.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Public OKP JWK for this key pair.
    pub fn public_jwk(&self) -> Jwk {
        Jwk {
            kty: "OKP".to_string(),
            crv: "Ed25519".to_string(),
            x: b64url_encode(&self.public_key_bytes()),
            y: None,
            d: None,
            kid: None,
            alg: None,
        }
    }

    /// Private OKP JWK for this key pair.
    pub fn to_jwk(&self) -> Jwk {
        let mut jwk = self.public_jwk();
        jwk.d = Some(b64url_encode(&self.signing_key.to_bytes()));
        jwk
    }

    /// Sign canonical bytes.
    pub fn sign(&self, data: &CanonicalBytes) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(data.as_bytes()).to_bytes()
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify an Ed25519 signature over canonical bytes against a public JWK.
///
/// Returns `Ok(false)` for a signature that does not verify, including one
/// of the wrong length. Returns `Err` only when the key cannot be used.
pub fn verify(data: &CanonicalBytes, signature: &[u8], jwk: &Jwk) -> Result<bool, CryptoError> {
    let x = jwk.x_bytes::<32>()?;
    let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(&x)
        .map_err(|e| CryptoError::InvalidKeyMaterial(format!("invalid Ed25519 public key: {e}")))?;
    let Ok(sig) = ed25519_dalek::Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(verifying_key.verify(data.as_bytes(), &sig).is_ok())
}
