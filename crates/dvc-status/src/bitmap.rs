//! # RevocationBitmap2022 Codec
//!
//! A revocation list is a roaring bitmap where bit `i` set means the
//! credential with index `i` is revoked. It travels inside a DID Document
//! service as
//!
//! ```text
//! data:application/octet-stream;base64,<base64(zlib(roaring portable bytes))>
//! ```
//!
//! The portable serialization is the cross-language roaring format, so
//! bitmaps written by other RevocationBitmap2022 implementations decode
//! here unchanged.
//!
//! ## Security Invariant
//!
//! Endpoints arrive inside remotely fetched documents. Inflation stops at
//! [`MAX_BITMAP_BYTES`]; a stream that would expand further is refused
//! before any bitmap is built.

use std::io::{Read, Write};

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use roaring::RoaringBitmap;

use crate::error::RevocationError;

/// Media type prefix of a revocation service endpoint.
pub const DATA_URL_PREFIX: &str = "data:application/octet-stream;base64,";

/// Upper bound on the inflated size of a serialized bitmap.
pub const MAX_BITMAP_BYTES: u64 = 8 * 1024 * 1024;

/// A set of revoked credential indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevocationBitmap(RoaringBitmap);

impl RevocationBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `index` revoked. Returns whether it was newly set.
    pub fn revoke(&mut self, index: u32) -> bool {
        self.0.insert(index)
    }

    /// Clear `index`. Returns whether it was set.
    pub fn unrevoke(&mut self, index: u32) -> bool {
        self.0.remove(index)
    }

    pub fn is_revoked(&self, index: u32) -> bool {
        self.0.contains(index)
    }

    /// Number of revoked indices.
    pub fn len(&self) -> u64 {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode as a service endpoint data URI.
    pub fn to_endpoint(&self) -> Result<String, RevocationError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        let mut serialized = Vec::with_capacity(self.0.serialized_size());
        self.0
            .serialize_into(&mut serialized)
            .map_err(|e| RevocationError::Encode(e.to_string()))?;
        encoder
            .write_all(&serialized)
            .map_err(|e| RevocationError::Encode(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| RevocationError::Encode(e.to_string()))?;
        Ok(format!("{DATA_URL_PREFIX}{}", STANDARD.encode(compressed)))
    }

    /// Decode a service endpoint data URI.
    ///
    /// Standard base64 is expected; unpadded base64url is also accepted.
    pub fn from_endpoint(endpoint: &str) -> Result<Self, RevocationError> {
        let payload = endpoint.strip_prefix(DATA_URL_PREFIX).ok_or_else(|| {
            RevocationError::InvalidEndpoint(format!(
                "expected a '{DATA_URL_PREFIX}' data URI"
            ))
        })?;
        let compressed = STANDARD
            .decode(payload)
            .or_else(|_| URL_SAFE_NO_PAD.decode(payload))
            .map_err(|e| RevocationError::Decode(format!("base64: {e}")))?;
        let mut serialized = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .take(MAX_BITMAP_BYTES + 1)
            .read_to_end(&mut serialized)
            .map_err(|e| RevocationError::Decode(format!("zlib: {e}")))?;
        if serialized.len() as u64 > MAX_BITMAP_BYTES {
            return Err(RevocationError::Decode(format!(
                "inflated bitmap exceeds {MAX_BITMAP_BYTES} bytes"
            )));
        }
        let bitmap = RoaringBitmap::deserialize_from(serialized.as_slice())
            .map_err(|e| RevocationError::Decode(format!("bitmap: {e}")))?;
        Ok(Self(bitmap))
    }
}

impl FromIterator<u32> for RevocationBitmap {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
