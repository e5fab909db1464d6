//! # DID Document Cache
//!
//! A TTL-bounded map from DID to resolved document. Expired entries are
//! evicted by the read that finds them.
//!
//! ## Concurrency
//!
//! One `parking_lot::Mutex` guards the whole map. The get-check-expire-evict
//! sequence and every insert run inside that single critical section, so an
//! eviction can never remove an entry a concurrent writer just refreshed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::document::DidDocument;

#[derive(Debug)]
struct CacheEntry {
    document: DidDocument,
    expires_at: Instant,
}

/// TTL cache of resolved DID Documents.
#[derive(Debug)]
pub struct DidCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl DidCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The default time-to-live for inserted entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached document for `did`, if present and unexpired.
    pub fn get(&self, did: &str) -> Option<DidDocument> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(did) {
            Some(entry) if Instant::now() < entry.expires_at => {
                return Some(entry.document.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(did);
            tracing::debug!(did, "evicted expired DID document");
        }
        None
    }

    /// Store `document` under `did` with the default TTL.
    pub fn insert(&self, did: &str, document: DidDocument) {
        self.insert_with_ttl(did, document, self.ttl);
    }

    /// Store `document` under `did` with an explicit TTL.
    pub fn insert_with_ttl(&self, did: &str, document: DidDocument, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries
            .lock()
            .insert(did.to_string(), CacheEntry { document, expires_at });
    }

    /// Drop the entry for `did`. Returns whether one was present.
    pub fn remove(&self, did: &str) -> bool {
        self.entries.lock().remove(did).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
