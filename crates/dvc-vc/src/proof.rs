//! # Proofs
//!
//! The `proof` member of a credential or presentation. The signature covers
//! the canonical form of everything except `proof` itself and travels in
//! `jws` as unpadded base64url of the raw signature bytes.

use dvc_core::{CanonicalBytes, WireTimestamp};
use dvc_crypto::{b64url_decode, b64url_encode, Algorithm, CryptoError, CryptoProvider, Jwk};
use serde::{Deserialize, Serialize};

use crate::error::VcError;

/// Why a proof was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// An issuer asserting the claims of a credential.
    AssertionMethod,
    /// A delegator passing authority to a delegate.
    Delegation,
    /// A holder answering a presentation challenge.
    Authentication,
}

impl std::fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AssertionMethod => "assertionMethod",
            Self::Delegation => "delegation",
            Self::Authentication => "authentication",
        };
        f.write_str(s)
    }
}

/// A signature over a canonical payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proof {
    /// Signature suite, e.g. `Ed25519Signature2020`.
    #[serde(rename = "type")]
    pub proof_type: String,

    pub created: WireTimestamp,

    #[serde(rename = "proofPurpose")]
    pub proof_purpose: ProofPurpose,

    /// DID URL of the signing key.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    pub jws: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
}

impl Proof {
    /// Sign `payload` with `key`. The suite follows the key's curve.
    pub fn sign(
        provider: &dyn CryptoProvider,
        payload: &CanonicalBytes,
        key: &Jwk,
        verification_method: String,
        proof_purpose: ProofPurpose,
        created: WireTimestamp,
        challenge: Option<String>,
    ) -> Result<Self, VcError> {
        let alg = key.algorithm()?;
        let signature = provider.sign(payload, key, alg)?;
        Ok(Self {
            proof_type: alg.proof_type().to_string(),
            created,
            proof_purpose,
            verification_method,
            jws: b64url_encode(&signature),
            challenge,
        })
    }

    /// Algorithm named by `type`. Unrecognized suites fall back to Ed25519.
    pub fn algorithm(&self) -> Algorithm {
        Algorithm::from_proof_type(Some(&self.proof_type))
    }

    /// Check the signature over `payload` against `public_key`.
    ///
    /// A `jws` that is not base64url, or a signature that does not verify,
    /// is `SignatureInvalid`. A key that does not fit the algorithm is
    /// `InvalidKeyMaterial`.
    pub fn verify(
        &self,
        provider: &dyn CryptoProvider,
        payload: &CanonicalBytes,
        public_key: &Jwk,
    ) -> Result<(), VcError> {
        let invalid = || VcError::SignatureInvalid {
            verification_method: self.verification_method.clone(),
        };
        let signature = b64url_decode(&self.jws).map_err(|_| invalid())?;
        match provider.verify(payload, &signature, public_key, self.algorithm()) {
            Ok(true) => Ok(()),
            Ok(false) => Err(invalid()),
            Err(CryptoError::Encoding(_)) => Err(invalid()),
            Err(e) => Err(e.into()),
        }
    }
}
