//! # dvc-did — DID Resolution
//!
//! Resolves issuer and holder DIDs to DID Documents:
//!
//! - **did:key**: computed locally from the identifier.
//! - **did:web**: fetched over HTTPS with a bounded timeout and a single
//!   plain-HTTP fallback.
//! - **Other methods** (ledger-backed): plugged in through [`DidMethod`];
//!   their network clients live outside this workspace.
//!
//! Every resolution goes through [`DidRegistry`], which consults the
//! [`DidCache`] before dispatching on the method segment.
//!
//! ## Crate Policy
//!
//! - Depends on `dvc-core` and `dvc-crypto` internally.
//! - No implicit retry beyond the did:web scheme fallback. Callers compose
//!   their own retry policy around the registry.

pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod key;
pub mod method;
pub mod registry;
pub mod web;

pub use cache::DidCache;
pub use config::{ConfigError, ResolverConfig};
pub use document::{DidDocument, Service, VerificationMethod, VerificationRelationship};
pub use error::DidError;
pub use key::{DidKeyMethod, KEY_FRAGMENT};
pub use method::{CreateOptions, CreatedDid, DidMethod};
pub use registry::DidRegistry;
pub use web::{did_web_url, DidWebMethod};
