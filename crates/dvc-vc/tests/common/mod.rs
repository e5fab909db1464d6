//! Shared fixtures: a registry with did:key, did:web, and an in-memory
//! ledger method named `mem`, plus engines wired to it.

#![allow(dead_code)]

use std::sync::Arc;

use dvc_core::Did;
use dvc_crypto::{CryptoProvider, DefaultCryptoProvider, Ed25519KeyPair, Jwk, Secp256k1KeyPair};
use dvc_did::{CreateOptions, DidRegistry, ResolverConfig};
use dvc_status::InMemoryDidMethod;
use dvc_vc::{ChainValidator, CredentialEngine, PresentationEngine, ValidatorConfig};

/// A DID and the private key that controls it.
pub struct Identity {
    pub did: Did,
    pub key: Jwk,
}

pub struct Fixture {
    pub registry: Arc<DidRegistry>,
    pub engine: CredentialEngine,
    pub validator: ChainValidator,
    pub presentations: PresentationEngine,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        let ledger = Arc::new(InMemoryDidMethod::new("mem"));
        let registry = Arc::new(
            DidRegistry::with_default_methods(&ResolverConfig::default())
                .unwrap()
                .with_method(ledger),
        );
        Self::with_registry(registry, config)
    }

    pub fn with_registry(registry: Arc<DidRegistry>, config: ValidatorConfig) -> Self {
        let provider: Arc<dyn CryptoProvider> = Arc::new(DefaultCryptoProvider::new());
        let validator = ChainValidator::new(registry.clone(), provider.clone(), config);
        Self {
            engine: CredentialEngine::new(provider.clone()),
            presentations: PresentationEngine::new(provider, validator.clone()),
            validator,
            registry,
        }
    }

    /// A fresh Ed25519 identity published on the `mem` ledger.
    pub async fn ledger_identity(&self) -> Identity {
        self.publish(Ed25519KeyPair::generate().to_jwk()).await
    }

    /// A fresh secp256k1 identity published on the `mem` ledger.
    pub async fn ledger_identity_k1(&self) -> Identity {
        self.publish(Secp256k1KeyPair::generate().to_jwk()).await
    }

    async fn publish(&self, key: Jwk) -> Identity {
        let options = CreateOptions::Ledger {
            method: "mem".to_string(),
            network: None,
            params: Default::default(),
        };
        let created = self.registry.create(&key.public(), &options).await.unwrap();
        Identity { did: created.did, key }
    }

    /// A fresh did:key identity.
    pub async fn key_identity(&self) -> Identity {
        let key = Ed25519KeyPair::generate().to_jwk();
        let created = self.registry.create(&key.public(), &CreateOptions::Key).await.unwrap();
        Identity { did: created.did, key }
    }
}
