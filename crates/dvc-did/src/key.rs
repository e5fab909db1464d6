//! # did:key
//!
//! Identifiers that are the public key itself:
//! `did:key:z` + base58btc(`0xED 0x01` || raw Ed25519 public key).
//!
//! Resolution is pure computation. The document carries the key as
//! `publicKeyMultibase` under the fragment `#keys-1`; the original JWK form
//! (its `kid` or `alg`) cannot be recovered from the identifier alone.

use async_trait::async_trait;
use dvc_core::Did;
use dvc_crypto::{Algorithm, Jwk};

use crate::document::{DidDocument, VerificationMethod, VerificationRelationship};
use crate::error::DidError;
use crate::method::{CreateOptions, CreatedDid, DidMethod};

/// Multicodec prefix for an Ed25519 public key.
const ED25519_MULTICODEC: [u8; 2] = [0xed, 0x01];

/// Fragment of the single verification method in a did:key document.
pub const KEY_FRAGMENT: &str = "keys-1";

/// Ed25519 2020 verification suite context.
const ED25519_2020_CONTEXT: &str = "https://w3id.org/security/suites/ed25519-2020/v1";

/// Multibase (`z` + base58btc) of the multicodec-tagged Ed25519 key.
pub fn encode_ed25519_multibase(public_key: &[u8; 32]) -> String {
    let mut tagged = Vec::with_capacity(34);
    tagged.extend_from_slice(&ED25519_MULTICODEC);
    tagged.extend_from_slice(public_key);
    format!("z{}", bs58::encode(tagged).into_string())
}

/// Inverse of [`encode_ed25519_multibase`].
pub fn decode_ed25519_multibase(multibase: &str) -> Result<[u8; 32], DidError> {
    let encoded = multibase
        .strip_prefix('z')
        .ok_or_else(|| DidError::InvalidKey(format!("unsupported multibase prefix in {multibase}")))?;
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| DidError::InvalidKey(format!("invalid base58btc: {e}")))?;
    let raw = bytes
        .strip_prefix(&ED25519_MULTICODEC[..])
        .ok_or_else(|| DidError::InvalidKey("not an Ed25519 multicodec key".to_string()))?;
    raw.try_into()
        .map_err(|_| DidError::InvalidKey(format!("Ed25519 key must be 32 bytes, got {}", raw.len())))
}

/// The did:key method.
#[derive(Debug, Default, Clone, Copy)]
pub struct DidKeyMethod;

impl DidKeyMethod {
    pub fn new() -> Self {
        Self
    }

    /// The did:key identifier for an Ed25519 public JWK.
    pub fn did_from_jwk(jwk: &Jwk) -> Result<Did, DidError> {
        let alg = jwk.algorithm().map_err(|e| DidError::InvalidKey(e.to_string()))?;
        if alg != Algorithm::Ed25519 {
            return Err(DidError::InvalidKey(format!("did:key supports Ed25519 keys only, got {alg}")));
        }
        let raw: [u8; 32] = dvc_crypto::b64url_decode(&jwk.x)
            .map_err(|e| DidError::InvalidKey(e.to_string()))?
            .try_into()
            .map_err(|_| DidError::InvalidKey("Ed25519 x must be 32 bytes".to_string()))?;
        Ok(Did::new(format!("did:key:{}", encode_ed25519_multibase(&raw)))?)
    }

    fn document(did: &Did, multibase: &str) -> DidDocument {
        let vm_id = did.with_fragment(KEY_FRAGMENT);
        let mut doc = DidDocument::new(did.as_str());
        doc.context = Some(serde_json::json!([
            crate::document::DID_CONTEXT_V1,
            ED25519_2020_CONTEXT
        ]));
        doc.verification_method.push(VerificationMethod {
            id: vm_id.clone(),
            type_: "Ed25519VerificationKey2020".to_string(),
            controller: did.to_string(),
            public_key_jwk: None,
            public_key_multibase: Some(multibase.to_string()),
        });
        doc.authentication.push(VerificationRelationship::Reference(vm_id.clone()));
        doc.assertion_method.push(VerificationRelationship::Reference(vm_id));
        doc
    }
}

#[async_trait]
impl DidMethod for DidKeyMethod {
    fn method_name(&self) -> &str {
        "key"
    }

    async fn resolve(&self, did: &Did) -> Result<DidDocument, DidError> {
        let multibase = did.method_specific_id();
        decode_ed25519_multibase(multibase).map_err(|e| DidError::InvalidDid(format!("{did}: {e}")))?;
        Ok(Self::document(did, multibase))
    }

    async fn create(&self, public_key: &Jwk, options: &CreateOptions) -> Result<CreatedDid, DidError> {
        if !matches!(options, CreateOptions::Key) {
            return Err(DidError::Method {
                method: "key".to_string(),
                reason: format!("unexpected options for method '{}'", options.method_name()),
            });
        }
        let did = Self::did_from_jwk(public_key)?;
        let document = Self::document(&did, did.method_specific_id());
        tracing::debug!(did = %did, "created did:key");
        Ok(CreatedDid { did, document })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dvc_crypto::{Ed25519KeyPair, Secp256k1KeyPair};

    #[test]
    fn multibase_round_trip() {
        let kp = Ed25519KeyPair::generate();
        let mb = encode_ed25519_multibase(&kp.public_key_bytes());
        assert!(mb.starts_with("z6Mk"));
        assert_eq!(decode_ed25519_multibase(&mb).unwrap(), kp.public_key_bytes());
    }

    #[test]
    fn known_vector() {
        // Published did:key Ed25519 test vector.
        let mb = "z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp";
        let raw = decode_ed25519_multibase(mb).unwrap();
        assert_eq!(encode_ed25519_multibase(&raw), mb);
    }

    #[test]
    fn rejects_non_ed25519_multicodec() {
        let tagged = [vec![0xe7, 0x01], vec![0u8; 33]].concat();
        let mb = format!("z{}", bs58::encode(tagged).into_string());
        assert!(matches!(decode_ed25519_multibase(&mb), Err(DidError::InvalidKey(_))));
        assert!(decode_ed25519_multibase("f00").is_err());
    }

    #[tokio::test]
    async fn create_then_resolve_yields_same_key() {
        let kp = Ed25519KeyPair::generate();
        let method = DidKeyMethod::new();
        let created = method.create(&kp.public_jwk(), &CreateOptions::Key).await.unwrap();
        assert!(created.did.as_str().starts_with("did:key:z"));

        let doc = method.resolve(&created.did).await.unwrap();
        assert_eq!(doc, created.document);
        let vm = doc
            .find_verification_method(&created.did.with_fragment("keys-1"))
            .unwrap();
        assert!(vm.public_key_jwk.is_none());
        assert_eq!(vm.resolve_jwk().unwrap().x, kp.public_jwk().x);
    }

    #[tokio::test]
    async fn create_rejects_secp256k1_keys() {
        let kp = Secp256k1KeyPair::generate();
        let err = DidKeyMethod::new()
            .create(&kp.public_jwk(), &CreateOptions::Key)
            .await
            .unwrap_err();
        assert!(matches!(err, DidError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn resolve_rejects_garbage_identifier() {
        let did = Did::new("did:key:notmultibase").unwrap();
        assert!(matches!(
            DidKeyMethod::new().resolve(&did).await,
            Err(DidError::InvalidDid(_))
        ));
    }
}
