//! # dvc-status — Credential Revocation
//!
//! `RevocationBitmap2022` support: the bitmap lives in a service entry of
//! the issuer's DID Document, and a credential's `credentialStatus` names
//! the service and its bit.
//!
//! - [`RevocationBitmap`]: the compressed bitmap and its data-URI codec.
//! - [`CredentialStatus`]: the credential-side pointer.
//! - [`is_revoked`] / [`validate_for_revoke`]: the checker.
//! - [`InMemoryDidMethod`]: a ledger-method stand-in that owns bitmaps and
//!   republishes them on revoke.
//!
//! ## Crate Policy
//!
//! - Depends on `dvc-core`, `dvc-crypto`, and `dvc-did` internally.
//! - Revocation state is never stored on a credential. It is read from, and
//!   written through, the issuer's DID method.

pub mod bitmap;
pub mod checker;
pub mod error;
pub mod memory;
pub mod status;

pub use bitmap::{RevocationBitmap, DATA_URL_PREFIX, MAX_BITMAP_BYTES};
pub use checker::{find_revocation_service, is_revoked, validate_for_revoke};
pub use error::RevocationError;
pub use memory::InMemoryDidMethod;
pub use status::{CredentialStatus, RevocationIndex, REVOCATION_BITMAP_2022, REVOCATION_SERVICE_FRAGMENT};
