//! # JSON Web Keys
//!
//! Key material crosses the provider boundary as JWK-shaped structures
//! (RFC 7517 / RFC 8037). Only the members this system uses are modeled.
//!
//! ## Security Invariant
//!
//! The private component `d` is zeroized on drop and never appears in
//! `Debug` output. [`Jwk::public()`] is the way to obtain a shareable copy.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithm::Algorithm;
use crate::error::CryptoError;

/// A JSON Web Key for an OKP (Ed25519) or EC (secp256k1) key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Jwk {
    /// Key type: `OKP` or `EC`.
    pub kty: String,
    /// Curve: `Ed25519` or `secp256k1`.
    pub crv: String,
    /// Public key (OKP) or x-coordinate (EC), base64url.
    pub x: String,
    /// y-coordinate (EC only), base64url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// Private key, base64url. Absent on public keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// Optional key identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Optional JOSE algorithm hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
}

impl Jwk {
    /// A copy of this key without the private component.
    pub fn public(&self) -> Jwk {
        Jwk {
            kty: self.kty.clone(),
            crv: self.crv.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
            d: None,
            kid: self.kid.clone(),
            alg: self.alg.clone(),
        }
    }

    /// Whether the private component is present.
    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }

    /// Infer the signature algorithm from `kty`/`crv`.
    pub fn algorithm(&self) -> Result<Algorithm, CryptoError> {
        match (self.kty.as_str(), self.crv.as_str()) {
            ("OKP", "Ed25519") => Ok(Algorithm::Ed25519),
            ("EC", "secp256k1") => Ok(Algorithm::Es256k),
            (kty, crv) => Err(CryptoError::InvalidKeyMaterial(format!(
                "unsupported key type kty={kty} crv={crv}"
            ))),
        }
    }

    /// Fail with `InvalidKeyMaterial` unless `kty`/`crv` match `alg`.
    pub fn ensure_algorithm(&self, alg: Algorithm) -> Result<(), CryptoError> {
        let (kty, crv) = alg.key_type();
        if self.kty != kty || self.crv != crv {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "{alg} requires kty={kty} crv={crv}, got kty={} crv={}",
                self.kty, self.crv
            )));
        }
        Ok(())
    }

    /// Decode the `x` member into exactly `N` bytes.
    pub(crate) fn x_bytes<const N: usize>(&self) -> Result<[u8; N], CryptoError> {
        decode_fixed(&self.x, "x")
    }

    /// Decode the `y` member into exactly `N` bytes.
    pub(crate) fn y_bytes<const N: usize>(&self) -> Result<[u8; N], CryptoError> {
        let y = self
            .y
            .as_deref()
            .ok_or_else(|| CryptoError::InvalidKeyMaterial("missing y coordinate".to_string()))?;
        decode_fixed(y, "y")
    }

    /// Decode the `d` member into exactly `N` bytes.
    pub(crate) fn d_bytes<const N: usize>(&self) -> Result<[u8; N], CryptoError> {
        let d = self
            .d
            .as_deref()
            .ok_or_else(|| CryptoError::InvalidKeyMaterial("missing private key (d)".to_string()))?;
        decode_fixed(d, "d")
    }
}

impl std::fmt::Debug for Jwk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("d", &self.d.as_ref().map(|_| "[REDACTED]"))
            .field("kid", &self.kid)
            .finish()
    }
}

/// Unpadded base64url encoding.
pub fn b64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Unpadded base64url decoding.
pub fn b64url_decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| CryptoError::Encoding(e.to_string()))
}

fn decode_fixed<const N: usize>(s: &str, member: &str) -> Result<[u8; N], CryptoError> {
    let bytes = b64url_decode(s)
        .map_err(|e| CryptoError::InvalidKeyMaterial(format!("{member}: {e}")))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        CryptoError::InvalidKeyMaterial(format!("{member} must be {N} bytes, got {len}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn okp() -> Jwk {
        Jwk {
            kty: "OKP".to_string(),
            crv: "Ed25519".to_string(),
            x: b64url_encode(&[7u8; 32]),
            y: None,
            d: Some(b64url_encode(&[9u8; 32])),
            kid: None,
            alg: None,
        }
    }

    #[test]
    fn public_strips_private_component() {
        let jwk = okp();
        assert!(jwk.is_private());
        let public = jwk.public();
        assert!(!public.is_private());
        assert_eq!(public.x, jwk.x);
    }

    #[test]
    fn algorithm_inferred_from_kty_crv() {
        assert_eq!(okp().algorithm().unwrap(), Algorithm::Ed25519);
        let mut ec = okp();
        ec.kty = "EC".to_string();
        ec.crv = "secp256k1".to_string();
        assert_eq!(ec.algorithm().unwrap(), Algorithm::Es256k);
        ec.crv = "P-256".to_string();
        assert!(matches!(ec.algorithm(), Err(CryptoError::InvalidKeyMaterial(_))));
    }

    #[test]
    fn ensure_algorithm_rejects_mismatch() {
        assert!(okp().ensure_algorithm(Algorithm::Ed25519).is_ok());
        assert!(matches!(
            okp().ensure_algorithm(Algorithm::Es256k),
            Err(CryptoError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn fixed_length_decoding() {
        let jwk = okp();
        assert_eq!(jwk.x_bytes::<32>().unwrap(), [7u8; 32]);
        assert!(jwk.x_bytes::<33>().is_err());
        assert!(jwk.y_bytes::<32>().is_err());
    }

    #[test]
    fn debug_redacts_private_key() {
        let debug = format!("{:?}", okp());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(&b64url_encode(&[9u8; 32])));
    }

    #[test]
    fn serde_omits_absent_members() {
        let json = serde_json::to_value(okp().public()).unwrap();
        assert_eq!(json["kty"], "OKP");
        assert!(json.get("d").is_none());
        assert!(json.get("y").is_none());
    }
}
