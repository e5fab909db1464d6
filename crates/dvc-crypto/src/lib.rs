//! # dvc-crypto — Crypto Provider Boundary
//!
//! Signing and verification for credential and presentation proofs:
//!
//! - **Ed25519** (`Ed25519Signature2020`), the required algorithm.
//! - **ES256K** (`EcdsaSecp256k1Signature2019`), the optional second curve.
//! - **JWK** key material with a redacting `Debug` and zeroize-on-drop.
//! - The [`CryptoProvider`] trait the credential engines sign through.
//!
//! ## Crate Policy
//!
//! - Depends only on `dvc-core` internally.
//! - No mocking of cryptographic operations in tests. All tests use real
//!   `CanonicalBytes` and real signatures.

pub mod algorithm;
pub mod ed25519;
pub mod error;
pub mod jwk;
pub mod provider;
pub mod secp256k1;

pub use algorithm::{Algorithm, ED25519_SUITE, ES256K_SUITE};
pub use ed25519::Ed25519KeyPair;
pub use error::CryptoError;
pub use jwk::{b64url_decode, b64url_encode, Jwk};
pub use provider::{CryptoProvider, DefaultCryptoProvider};
pub use secp256k1::Secp256k1KeyPair;
