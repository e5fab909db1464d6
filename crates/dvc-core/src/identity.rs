//! # Decentralized Identifiers
//!
//! `Did` validates the `did:<method>:<method-specific-id>` shape at
//! construction so method dispatch never has to re-parse a raw string.
//! DID URLs (`did:...#fragment`) are represented as plain strings on the
//! wire; [`Did::with_fragment`] builds them.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// W3C Decentralized Identifier (DID).
///
/// # Validation
///
/// - Must start with `did:`
/// - Method name must be non-empty, lowercase alphanumeric
/// - Method-specific identifier must be non-empty
/// - No fragment (`#`) or query (`?`) component
///
/// Reference: <https://www.w3.org/TR/did-core/#did-syntax>
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Did(String);

impl Did {
    /// Create a DID from a string, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDid`] if the string does not
    /// match the `did:method:identifier` format.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        split(&s).ok_or_else(|| ValidationError::InvalidDid(s.clone()))?;
        Ok(Self(s))
    }

    /// Access the DID string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the DID method (the part between the first and second colons).
    pub fn method(&self) -> &str {
        split(&self.0).map(|(m, _)| m).unwrap_or_default()
    }

    /// Return the method-specific identifier (everything after `did:method:`).
    pub fn method_specific_id(&self) -> &str {
        split(&self.0).map(|(_, id)| id).unwrap_or_default()
    }

    /// Build the DID URL `<did>#<fragment>`.
    pub fn with_fragment(&self, fragment: &str) -> String {
        format!("{}#{}", self.0, fragment)
    }
}

/// Split a DID into `(method, method-specific-id)` if it is well formed.
fn split(s: &str) -> Option<(&str, &str)> {
    let rest = s.strip_prefix("did:")?;
    let (method, id) = rest.split_once(':')?;
    if method.is_empty()
        || !method
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return None;
    }
    if id.is_empty() || id.contains('#') || id.contains('?') {
        return None;
    }
    Some((method, id))
}

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Did {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Did {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
