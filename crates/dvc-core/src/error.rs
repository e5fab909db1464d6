//! # Error Types
//!
//! Errors raised by the foundational types. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// The value nests deeper than any acyclic payload may, which is how a
    /// self-referential structure presents once it has been unrolled.
    #[error("circular reference: value nests deeper than {max_depth} levels")]
    CircularReference {
        /// The nesting bound that was exceeded.
        max_depth: usize,
    },

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error validating a domain primitive at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The string is not a `did:<method>:<method-specific-id>` identifier.
    #[error("invalid DID: {0:?}")]
    InvalidDid(String),

    /// The string is not an RFC 3339 UTC timestamp.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
