//! # ES256K Signing and Verification
//!
//! ECDSA over secp256k1 with SHA-256, the second supported curve.
//! Signatures are the fixed 64-byte `r || s` form with low-S normalization.

use dvc_core::CanonicalBytes;
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::{EncodedPoint, FieldBytes};

use crate::error::CryptoError;
use crate::jwk::{b64url_encode, Jwk};

/// A secp256k1 key pair for signing operations.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate a new random secp256k1 key pair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: SigningKey::random(&mut csprng),
        }
    }

    /// Load a key pair from a private EC/secp256k1 JWK.
    pub fn from_jwk(jwk: &Jwk) -> Result<Self, CryptoError> {
        let d = jwk.d_bytes::<32>()?;
        let signing_key = SigningKey::from_slice(&d)
            .map_err(|e| CryptoError::InvalidKeyMaterial(format!("invalid secp256k1 scalar: {e}")))?;
        let pair = Self { signing_key };
        let public = pair.public_jwk();
        if public.x != jwk.x || public.y != jwk.y {
            return Err(CryptoError::InvalidKeyMaterial(
                "secp256k1 private key does not match public coordinates".to_string(),
            ));
        }
        Ok(pair)
    }

    /// Public EC JWK for this key pair.
    pub fn public_jwk(&self) -> Jwk {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        Jwk {
            kty: "EC".to_string(),
            crv: "secp256k1".to_string(),
            x: point.x().map(|x| b64url_encode(x)).unwrap_or_default(),
            y: point.y().map(|y| b64url_encode(y)),
            d: None,
            kid: None,
            alg: None,
        }
    }

    /// Private EC JWK for this key pair.
    pub fn to_jwk(&self) -> Jwk {
        let mut jwk = self.public_jwk();
        jwk.d = Some(b64url_encode(&self.signing_key.to_bytes()));
        jwk
    }

    /// Sign canonical bytes, returning `r || s`.
    pub fn sign(&self, data: &CanonicalBytes) -> Vec<u8> {
        let signature: Signature = self.signing_key.sign(data.as_bytes());
        signature.to_bytes().to_vec()
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1KeyPair(<private>)")
    }
}

/// Verify an ES256K signature over canonical bytes against a public JWK.
pub fn verify(data: &CanonicalBytes, signature: &[u8], jwk: &Jwk) -> Result<bool, CryptoError> {
    let x = jwk.x_bytes::<32>()?;
    let y = jwk.y_bytes::<32>()?;
    let point = EncodedPoint::from_affine_coordinates(
        FieldBytes::from_slice(&x),
        FieldBytes::from_slice(&y),
        false,
    );
    let verifying_key = VerifyingKey::from_encoded_point(&point)
        .map_err(|e| CryptoError::InvalidKeyMaterial(format!("point not on secp256k1: {e}")))?;
    let Ok(sig) = Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(verifying_key.verify(data.as_bytes(), &sig).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(v: serde_json::Value) -> CanonicalBytes {
        CanonicalBytes::new(&v).unwrap()
    }

    #[test]
    fn sign_and_verify() {
        let kp = Secp256k1KeyPair::generate();
        let data = canonical(serde_json::json!({"claim": "member"}));
        let sig = kp.sign(&data);
        assert_eq!(sig.len(), 64);
        assert!(verify(&data, &sig, &kp.public_jwk()).unwrap());
    }

    #[test]
    fn tampered_message_does_not_verify() {
        let kp = Secp256k1KeyPair::generate();
        let sig = kp.sign(&canonical(serde_json::json!({"n": 1})));
        assert!(!verify(&canonical(serde_json::json!({"n": 2})), &sig, &kp.public_jwk()).unwrap());
    }

    #[test]
    fn jwk_round_trip_preserves_key() {
        let kp = Secp256k1KeyPair::generate();
        let restored = Secp256k1KeyPair::from_jwk(&kp.to_jwk()).unwrap();
        assert_eq!(restored.public_jwk(), kp.public_jwk());
    }

    #[test]
    fn public_jwk_has_both_coordinates() {
        let jwk = Secp256k1KeyPair::generate().public_jwk();
        assert_eq!(jwk.x_bytes::<32>().unwrap().len(), 32);
        assert_eq!(jwk.y_bytes::<32>().unwrap().len(), 32);
    }

    #[test]
    fn mismatched_private_key_rejected() {
        let mut jwk = Secp256k1KeyPair::generate().to_jwk();
        jwk.d = Secp256k1KeyPair::generate().to_jwk().d.clone();
        assert!(matches!(
            Secp256k1KeyPair::from_jwk(&jwk),
            Err(CryptoError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn off_curve_point_is_invalid_key() {
        let mut jwk = Secp256k1KeyPair::generate().public_jwk();
        jwk.y = Some(b64url_encode(&[1u8; 32]));
        let data = canonical(serde_json::json!({}));
        assert!(matches!(
            verify(&data, &[0u8; 64], &jwk),
            Err(CryptoError::InvalidKeyMaterial(_))
        ));
    }
}
