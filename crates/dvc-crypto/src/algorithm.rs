//! # Signature Algorithms and Proof Suites
//!
//! The fixed table mapping proof `type` strings to signature algorithms.
//!
//! | Proof type                     | Algorithm |
//! |--------------------------------|-----------|
//! | `Ed25519Signature2020`         | Ed25519   |
//! | `EcdsaSecp256k1Signature2019`  | ES256K    |
//! | anything else, or absent       | Ed25519   |
//!
//! The fallback is deliberate and pinned: an unrecognized suite is verified
//! as Ed25519, and the provider's `kty`/`crv` check then rejects any key
//! that is not an Ed25519 key, so the fallback cannot cross algorithms.

use serde::{Deserialize, Serialize};

/// Proof type string for Ed25519 proofs.
pub const ED25519_SUITE: &str = "Ed25519Signature2020";

/// Proof type string for ES256K proofs.
pub const ES256K_SUITE: &str = "EcdsaSecp256k1Signature2019";

/// A signature algorithm the crypto provider understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// EdDSA over Curve25519.
    #[serde(rename = "EdDSA")]
    Ed25519,
    /// ECDSA over secp256k1 with SHA-256.
    #[serde(rename = "ES256K")]
    Es256k,
}

impl Algorithm {
    /// Map a proof `type` to its algorithm, falling back to Ed25519.
    pub fn from_proof_type(proof_type: Option<&str>) -> Self {
        match proof_type {
            Some(ES256K_SUITE) => Self::Es256k,
            Some(ED25519_SUITE) => Self::Ed25519,
            other => {
                if let Some(unknown) = other {
                    tracing::debug!(proof_type = unknown, "unrecognized proof type, using Ed25519");
                }
                Self::Ed25519
            }
        }
    }

    /// The proof `type` string this algorithm signs under.
    pub fn proof_type(&self) -> &'static str {
        match self {
            Self::Ed25519 => ED25519_SUITE,
            Self::Es256k => ES256K_SUITE,
        }
    }

    /// The JOSE `alg` name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519 => "EdDSA",
            Self::Es256k => "ES256K",
        }
    }

    /// The JWK `(kty, crv)` pair keys for this algorithm must carry.
    pub fn key_type(&self) -> (&'static str, &'static str) {
        match self {
            Self::Ed25519 => ("OKP", "Ed25519"),
            Self::Es256k => ("EC", "secp256k1"),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
