//! # Canonical Serialization — JCS Payload Bytes
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! that are signed or verified anywhere in the workspace.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()` or
//! `CanonicalBytes::from_value()`, which bound the nesting depth and then
//! serialize with RFC 8785 (JSON Canonicalization Scheme):
//!
//! 1. Object keys are sorted, recursively.
//! 2. Array order is preserved.
//! 3. Primitives use standard JSON encoding (ECMAScript number form).
//! 4. No insignificant whitespace.
//!
//! Signers and verifiers that both go through this type agree on the bytes
//! for any two values with the same key/value pairs, whatever order the
//! keys were inserted in.
//!
//! ## Cycles
//!
//! An owned `serde_json::Value` is a tree, so a cycle can only reach this
//! module after a `Serialize` impl has unrolled it. Unrolled cycles nest
//! without bound; anything deeper than [`MAX_CANONICAL_DEPTH`] is rejected
//! with `CanonicalizationError::CircularReference`.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Deepest nesting accepted by the canonicalizer.
pub const MAX_CANONICAL_DEPTH: usize = 256;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructors are `CanonicalBytes::new()` and
///   `CanonicalBytes::from_value()`.
/// - Keys are sorted at every level; separators are compact.
/// - The content is valid UTF-8 JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(String);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::CircularReference` if the value nests
    /// beyond [`MAX_CANONICAL_DEPTH`]. Returns
    /// `CanonicalizationError::SerializationFailed` if the value cannot be
    /// represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(value)
    }

    /// Construct canonical bytes from an already-built JSON value.
    pub fn from_value(value: Value) -> Result<Self, CanonicalizationError> {
        check_depth(&value, 0)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s))
    }

    /// Access the canonical bytes for signing or verification.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Access the canonical form as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for CanonicalBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical string form of a serializable value.
///
/// Shorthand for `CanonicalBytes::new(value)?.as_str().to_owned()`.
pub fn canonicalize(value: &impl Serialize) -> Result<String, CanonicalizationError> {
    Ok(CanonicalBytes::new(value)?.0)
}

fn check_depth(value: &Value, depth: usize) -> Result<(), CanonicalizationError> {
    if depth > MAX_CANONICAL_DEPTH {
        return Err(CanonicalizationError::CircularReference {
            max_depth: MAX_CANONICAL_DEPTH,
        });
    }
    match value {
        Value::Array(items) => items.iter().try_for_each(|v| check_depth(v, depth + 1)),
        Value::Object(map) => map.values().try_for_each(|v| check_depth(v, depth + 1)),
        _ => Ok(()),
    }
}
