//! # dvc-vc — Delegated Verifiable Credentials
//!
//! Issues, delegates, presents, verifies, and revokes W3C Verifiable
//! Credentials anchored to DIDs.
//!
//! - [`CredentialEngine`] signs credentials and delegated credentials.
//! - [`ChainValidator`] verifies a credential together with every parent
//!   embedded under `credentialSubject.parentVC`.
//! - [`PresentationEngine`] builds and checks holder-signed presentations.
//! - [`revoke_credential`] sets a credential's revocation bit through its
//!   issuer's DID method.
//!
//! The engines take their [`DidRegistry`](dvc_did::DidRegistry) and
//! [`CryptoProvider`](dvc_crypto::CryptoProvider) as constructor arguments;
//! there is no process-wide resolver state.
//!
//! ## Crate Policy
//!
//! - Depends on every other `dvc-*` crate; nothing depends on it.
//! - Every verification failure is a distinct [`VcError`] variant.

pub mod chain;
pub mod config;
pub mod credential;
pub mod error;
pub mod issuer;
pub mod presentation;
pub mod proof;
pub mod revocation;
pub mod scope;
pub mod validator;

pub use chain::DelegationChain;
pub use config::{PresentationPolicy, ValidatorConfig, DEFAULT_MAX_CHAIN_DEPTH};
pub use credential::{
    CredentialSubject, VerifiableCredential, DELEGATED_CREDENTIAL, VC_CONTEXT_V1, VERIFIABLE_CREDENTIAL,
};
pub use error::VcError;
pub use issuer::{CredentialEngine, CredentialParams, DelegationParams};
pub use presentation::{PresentationEngine, VerifiablePresentation, VERIFIABLE_PRESENTATION};
pub use proof::{Proof, ProofPurpose};
pub use revocation::revoke_credential;
pub use scope::{check_scope, is_structural_subset};
pub use validator::{ChainValidator, IssuerKeyChain, VerifiedSigner};
