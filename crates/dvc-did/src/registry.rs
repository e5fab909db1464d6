//! # DID Resolution Registry
//!
//! Method-prefix dispatch over registered [`DidMethod`]s, fronted by a
//! [`DidCache`]. The registry is built at startup and handed to the
//! credential engines as an `Arc<DidRegistry>`; there is no process-wide
//! resolver table.

use std::collections::HashMap;
use std::sync::Arc;

use dvc_core::Did;
use dvc_crypto::Jwk;

use crate::cache::DidCache;
use crate::config::ResolverConfig;
use crate::document::DidDocument;
use crate::error::DidError;
use crate::key::DidKeyMethod;
use crate::method::{CreateOptions, CreatedDid, DidMethod};
use crate::web::DidWebMethod;

/// Registered DID methods plus the shared document cache.
pub struct DidRegistry {
    methods: HashMap<String, Arc<dyn DidMethod>>,
    cache: DidCache,
}

impl DidRegistry {
    /// An empty registry whose cache uses `config.cache_ttl`.
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            methods: HashMap::new(),
            cache: DidCache::new(config.cache_ttl),
        }
    }

    /// A registry with did:key and did:web registered.
    pub fn with_default_methods(config: &ResolverConfig) -> Result<Self, DidError> {
        let mut registry = Self::new(config);
        registry.register(Arc::new(DidKeyMethod::new()));
        registry.register(Arc::new(DidWebMethod::new(config)?));
        Ok(registry)
    }

    /// Register `method` under its method name, replacing any previous one.
    pub fn register(&mut self, method: Arc<dyn DidMethod>) {
        let name = method.method_name().to_string();
        if self.methods.insert(name.clone(), method).is_some() {
            tracing::warn!(method = %name, "replaced registered DID method");
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_method(mut self, method: Arc<dyn DidMethod>) -> Self {
        self.register(method);
        self
    }

    /// Whether a method is registered for `did`.
    pub fn supports(&self, did: &Did) -> bool {
        self.methods.contains_key(did.method())
    }

    /// Registered method names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn method_for(&self, name: &str) -> Result<&Arc<dyn DidMethod>, DidError> {
        self.methods
            .get(name)
            .ok_or_else(|| DidError::UnknownDidMethod(name.to_string()))
    }

    /// Resolve `did`, consulting the cache first.
    pub async fn resolve(&self, did: &Did) -> Result<DidDocument, DidError> {
        if let Some(document) = self.cache.get(did.as_str()) {
            tracing::debug!(did = %did, "DID cache hit");
            return Ok(document);
        }
        let method = self.method_for(did.method())?;
        let document = method.resolve(did).await?;
        self.cache.insert(did.as_str(), document.clone());
        tracing::debug!(did = %did, "resolved and cached DID document");
        Ok(document)
    }

    /// Parse and resolve a DID string.
    pub async fn resolve_str(&self, did: &str) -> Result<DidDocument, DidError> {
        self.resolve(&Did::new(did)?).await
    }

    /// Create a DID with the method named by `options`.
    pub async fn create(&self, public_key: &Jwk, options: &CreateOptions) -> Result<CreatedDid, DidError> {
        let method = self.method_for(options.method_name())?;
        let created = method.create(public_key, options).await?;
        tracing::info!(did = %created.did, "created DID");
        Ok(created)
    }

    /// Revoke bit `index` through the issuer's method and drop the issuer's
    /// cached document so the next resolution sees the new bitmap.
    pub async fn revoke(&self, issuer: &Did, index: u32, signing_key: &Jwk) -> Result<DidDocument, DidError> {
        let method = self.method_for(issuer.method())?;
        let document = method.revoke(issuer, index, signing_key).await?;
        self.cache.remove(issuer.as_str());
        tracing::info!(did = %issuer, index, "revocation published");
        Ok(document)
    }

    /// Drop the cached document for `did`.
    pub fn invalidate(&self, did: &Did) -> bool {
        self.cache.remove(did.as_str())
    }

    pub fn cache(&self) -> &DidCache {
        &self.cache
    }
}

impl std::fmt::Debug for DidRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DidRegistry")
            .field("methods", &self.method_names())
            .field("cache_entries", &self.cache.len())
            .finish()
    }
}
