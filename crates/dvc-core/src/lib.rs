//! # dvc-core — Foundational Types
//!
//! The leaf of the workspace DAG. Every other `dvc-*` crate depends on it;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every signing and verification input
//!    is a `CanonicalBytes` value. Two logically equal payloads
//!    produce identical bytes regardless of in-memory key order, so an
//!    independent verifier re-derives exactly what the signer signed.
//!
//! 2. **Dates keep their wire text.** `WireTimestamp` writes back exactly
//!    the RFC 3339 text it was read from, so a received credential
//!    re-serializes to the bytes its issuer signed. `Timestamp` is the UTC
//!    instant used for ordering.
//!
//! 3. **Validated identifiers.** `Did` is checked at construction; no bare
//!    strings cross crate boundaries where a DID is meant.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dvc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::{canonicalize, CanonicalBytes, MAX_CANONICAL_DEPTH};
pub use error::{CanonicalizationError, ValidationError};
pub use identity::Did;
pub use temporal::{Timestamp, WireTimestamp};
