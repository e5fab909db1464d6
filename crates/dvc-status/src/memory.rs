//! # In-Memory Ledger Method
//!
//! A [`DidMethod`] that keeps documents in process memory, standing in for a
//! ledger-backed method. It implements the full `{resolve, create, revoke}`
//! contract: `create` mints `did:<name>:<uuid>` with an empty
//! `RevocationBitmap2022` service, and `revoke` sets a bit and republishes
//! the bitmap into the stored document.
//!
//! Revocation requires the controller's private key. The method proves
//! possession by signing a revocation statement with the supplied key and
//! verifying it against the controller's published key.

use std::collections::HashMap;

use async_trait::async_trait;
use dvc_core::{CanonicalBytes, Did};
use dvc_crypto::{CryptoProvider, DefaultCryptoProvider, Jwk};
use dvc_did::{
    CreateOptions, CreatedDid, DidDocument, DidError, DidMethod, Service, VerificationMethod,
    VerificationRelationship, KEY_FRAGMENT,
};
use parking_lot::RwLock;
use serde_json::{json, Value};

use crate::bitmap::RevocationBitmap;
use crate::status::{REVOCATION_BITMAP_2022, REVOCATION_SERVICE_FRAGMENT};

struct LedgerEntry {
    document: DidDocument,
    controller: Jwk,
    bitmap: RevocationBitmap,
}

/// Process-local DID method with revocation support.
pub struct InMemoryDidMethod {
    name: String,
    entries: RwLock<HashMap<String, LedgerEntry>>,
}

impl InMemoryDidMethod {
    /// A method registered under `name` (e.g. `"mem"`).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of DIDs held.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn method_error(&self, reason: impl Into<String>) -> DidError {
        DidError::Method {
            method: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn build_document(did: &Did, controller: &Jwk, bitmap: &RevocationBitmap) -> Result<DidDocument, DidError> {
        let vm_id = did.with_fragment(KEY_FRAGMENT);
        let mut document = DidDocument::new(did.as_str());
        document
            .verification_method
            .push(VerificationMethod::json_web_key(vm_id.clone(), did.as_str(), controller)?);
        document
            .authentication
            .push(VerificationRelationship::Reference(vm_id.clone()));
        document
            .assertion_method
            .push(VerificationRelationship::Reference(vm_id));
        document.service.push(revocation_service(did, bitmap)?);
        Ok(document)
    }

    /// Check that `signing_key` is the private half of `controller`.
    fn authorize(&self, issuer: &Did, index: u32, controller: &Jwk, signing_key: &Jwk) -> Result<(), DidError> {
        let alg = controller
            .algorithm()
            .map_err(|e| DidError::InvalidKey(e.to_string()))?;
        let statement = CanonicalBytes::new(&json!({
            "action": "revoke",
            "did": issuer.as_str(),
            "index": index,
        }))
        .map_err(|e| self.method_error(e.to_string()))?;
        let provider = DefaultCryptoProvider::new();
        let signature = provider
            .sign(&statement, signing_key, alg)
            .map_err(|e| self.method_error(format!("revocation not authorized: {e}")))?;
        let valid = provider
            .verify(&statement, &signature, controller, alg)
            .map_err(|e| self.method_error(e.to_string()))?;
        if !valid {
            return Err(self.method_error("signing key does not control the DID"));
        }
        Ok(())
    }
}

fn revocation_service(did: &Did, bitmap: &RevocationBitmap) -> Result<Service, DidError> {
    let endpoint = bitmap.to_endpoint().map_err(|e| DidError::Method {
        method: did.method().to_string(),
        reason: e.to_string(),
    })?;
    Ok(Service {
        id: did.with_fragment(REVOCATION_SERVICE_FRAGMENT),
        type_: REVOCATION_BITMAP_2022.to_string(),
        service_endpoint: Value::String(endpoint),
    })
}

#[async_trait]
impl DidMethod for InMemoryDidMethod {
    fn method_name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, did: &Did) -> Result<DidDocument, DidError> {
        self.entries
            .read()
            .get(did.as_str())
            .map(|entry| entry.document.clone())
            .ok_or_else(|| DidError::NotFound(did.to_string()))
    }

    async fn create(&self, public_key: &Jwk, options: &CreateOptions) -> Result<CreatedDid, DidError> {
        if options.method_name() != self.name {
            return Err(self.method_error(format!(
                "options are for method '{}'",
                options.method_name()
            )));
        }
        public_key
            .algorithm()
            .map_err(|e| DidError::InvalidKey(e.to_string()))?;

        let did = Did::new(format!("did:{}:{}", self.name, uuid::Uuid::new_v4().simple()))?;
        let controller = public_key.public();
        let bitmap = RevocationBitmap::new();
        let document = Self::build_document(&did, &controller, &bitmap)?;

        self.entries.write().insert(
            did.to_string(),
            LedgerEntry {
                document: document.clone(),
                controller,
                bitmap,
            },
        );
        tracing::info!(did = %did, "published DID to in-memory ledger");
        Ok(CreatedDid { did, document })
    }

    async fn revoke(&self, issuer: &Did, index: u32, signing_key: &Jwk) -> Result<DidDocument, DidError> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(issuer.as_str())
            .ok_or_else(|| DidError::NotFound(issuer.to_string()))?;
        self.authorize(issuer, index, &entry.controller, signing_key)?;

        let mut bitmap = entry.bitmap.clone();
        bitmap.revoke(index);
        let service = revocation_service(issuer, &bitmap)?;
        entry.document.upsert_service(service);
        entry.bitmap = bitmap;
        tracing::info!(did = %issuer, index, revoked = entry.bitmap.len(), "republished revocation bitmap");
        Ok(entry.document.clone())
    }
}

impl std::fmt::Debug for InMemoryDidMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDidMethod")
            .field("name", &self.name)
            .field("dids", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::is_revoked;
    use crate::status::CredentialStatus;
    use dvc_crypto::{Ed25519KeyPair, Secp256k1KeyPair};

    fn ledger_opts() -> CreateOptions {
        CreateOptions::Ledger {
            method: "mem".to_string(),
            network: None,
            params: Default::default(),
        }
    }

    #[tokio::test]
    async fn create_publishes_resolvable_document() {
        let method = InMemoryDidMethod::new("mem");
        let key = Ed25519KeyPair::generate();
        let created = method.create(&key.to_jwk(), &ledger_opts()).await.unwrap();

        assert_eq!(created.did.method(), "mem");
        let doc = method.resolve(&created.did).await.unwrap();
        assert_eq!(doc, created.document);
        let vm = doc.find_verification_method(&created.did.with_fragment("keys-1")).unwrap();
        assert!(vm.public_key_jwk.as_ref().unwrap().get("d").is_none());
        assert_eq!(vm.resolve_jwk().unwrap().x, key.public_jwk().x);
        assert!(doc.find_service(&created.did.with_fragment("revocation")).is_some());
    }

    #[tokio::test]
    async fn revoke_sets_bit_in_published_bitmap() {
        let method = InMemoryDidMethod::new("mem");
        let key = Ed25519KeyPair::generate();
        let created = method.create(&key.public_jwk(), &ledger_opts()).await.unwrap();

        let doc = method.revoke(&created.did, 5, &key.to_jwk()).await.unwrap();
        assert!(is_revoked(&doc, &CredentialStatus::revocation_bitmap(&created.did, 5)).unwrap());
        assert!(!is_revoked(&doc, &CredentialStatus::revocation_bitmap(&created.did, 6)).unwrap());

        let resolved = method.resolve(&created.did).await.unwrap();
        assert_eq!(resolved, doc);
    }

    #[tokio::test]
    async fn revoke_accumulates_bits() {
        let method = InMemoryDidMethod::new("mem");
        let key = Secp256k1KeyPair::generate();
        let created = method.create(&key.public_jwk(), &ledger_opts()).await.unwrap();

        method.revoke(&created.did, 1, &key.to_jwk()).await.unwrap();
        let doc = method.revoke(&created.did, 2, &key.to_jwk()).await.unwrap();
        for index in [1, 2] {
            assert!(is_revoked(&doc, &CredentialStatus::revocation_bitmap(&created.did, index)).unwrap());
        }
    }

    #[tokio::test]
    async fn revoke_with_foreign_key_is_refused() {
        let method = InMemoryDidMethod::new("mem");
        let owner = Ed25519KeyPair::generate();
        let created = method.create(&owner.public_jwk(), &ledger_opts()).await.unwrap();

        let intruder = Ed25519KeyPair::generate();
        let err = method.revoke(&created.did, 0, &intruder.to_jwk()).await.unwrap_err();
        assert!(matches!(err, DidError::Method { .. }));

        let doc = method.resolve(&created.did).await.unwrap();
        assert!(!is_revoked(&doc, &CredentialStatus::revocation_bitmap(&created.did, 0)).unwrap());
    }

    #[tokio::test]
    async fn unknown_did_is_not_found() {
        let method = InMemoryDidMethod::new("mem");
        let did = Did::new("did:mem:missing").unwrap();
        assert_eq!(method.resolve(&did).await, Err(DidError::NotFound(did.to_string())));
    }

    #[tokio::test]
    async fn options_for_other_method_are_rejected() {
        let method = InMemoryDidMethod::new("mem");
        let key = Ed25519KeyPair::generate();
        assert!(method.create(&key.public_jwk(), &CreateOptions::Key).await.is_err());
    }
}
