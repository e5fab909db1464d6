//! # Credential Revocation
//!
//! Revoking a credential sets its bit in the issuer's revocation bitmap.
//! This module only validates the credential's status and hands the
//! bit-set-and-republish to the issuer's DID method through the registry;
//! the method owns the bitmap.

use dvc_crypto::Jwk;
use dvc_did::{DidDocument, DidRegistry};
use dvc_status::validate_for_revoke;

use crate::credential::VerifiableCredential;
use crate::error::VcError;

/// Revoke `vc` with its issuer's private key.
///
/// Returns the issuer's republished DID Document. Methods without
/// revocation support fail with `NotImplemented`.
pub async fn revoke_credential(
    registry: &DidRegistry,
    vc: &VerifiableCredential,
    issuer_key: &Jwk,
) -> Result<DidDocument, VcError> {
    let index = validate_for_revoke(vc.credential_status.as_ref())?;
    let document = registry.revoke(&vc.issuer, index, issuer_key).await?;
    tracing::info!(issuer = %vc.issuer, index, "credential revoked");
    Ok(document)
}
