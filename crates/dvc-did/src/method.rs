//! # DID Method Contract
//!
//! Every DID method, whether computed locally (did:key), fetched over HTTP
//! (did:web), or backed by a ledger client living outside this workspace,
//! plugs into the [`DidRegistry`](crate::DidRegistry) through [`DidMethod`].
//! Methods that cannot create or revoke keep the default implementations,
//! which fail with `DidError::NotImplemented`.

use async_trait::async_trait;
use dvc_core::Did;
use dvc_crypto::Jwk;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::DidDocument;
use crate::error::DidError;

/// Method-specific options for [`DidMethod::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum CreateOptions {
    /// did:key needs nothing beyond the public key.
    Key,
    /// did:web: the hosting domain (optionally `host:port`) and path.
    Web {
        domain: String,
        #[serde(default)]
        path: Vec<String>,
    },
    /// A ledger-backed method registered under `method`.
    Ledger {
        #[serde(rename = "name")]
        method: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        network: Option<String>,
        #[serde(default)]
        params: Map<String, Value>,
    },
}

impl CreateOptions {
    /// The registry key of the method these options are for.
    pub fn method_name(&self) -> &str {
        match self {
            Self::Key => "key",
            Self::Web { .. } => "web",
            Self::Ledger { method, .. } => method,
        }
    }
}

/// Result of [`DidMethod::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedDid {
    pub did: Did,
    pub document: DidDocument,
}

/// A pluggable DID method.
#[async_trait]
pub trait DidMethod: Send + Sync {
    /// The method name (e.g. `"key"`, `"web"`).
    fn method_name(&self) -> &str;

    /// Resolve a DID to its document.
    async fn resolve(&self, did: &Did) -> Result<DidDocument, DidError>;

    /// Create a new DID controlled by `public_key`.
    async fn create(&self, public_key: &Jwk, options: &CreateOptions) -> Result<CreatedDid, DidError> {
        let _ = (public_key, options);
        Err(DidError::NotImplemented {
            method: self.method_name().to_string(),
            operation: "create",
        })
    }

    /// Set revocation bit `index` on the issuer's bitmap and republish the
    /// issuer's document, returning the updated document.
    ///
    /// `signing_key` is the issuer's private key, which the method uses to
    /// authorize the update.
    async fn revoke(&self, issuer: &Did, index: u32, signing_key: &Jwk) -> Result<DidDocument, DidError> {
        let _ = (issuer, index, signing_key);
        Err(DidError::NotImplemented {
            method: self.method_name().to_string(),
            operation: "revoke",
        })
    }

    /// Whether this method handles `did`.
    fn supports(&self, did: &Did) -> bool {
        did.method() == self.method_name()
    }
}
