//! Validator and presentation configuration.

use dvc_did::ConfigError;

/// Default bound on delegation chain length.
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 16;

/// Configuration for [`ChainValidator`](crate::ChainValidator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Most credentials a chain may hold, leaf and root included.
    pub max_chain_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DVC_MAX_CHAIN_DEPTH` (default: 16, must be positive)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let Some(raw) = lookup("DVC_MAX_CHAIN_DEPTH") else {
            return Ok(Self::default());
        };
        let invalid = |reason: String| ConfigError::InvalidValue {
            var: "DVC_MAX_CHAIN_DEPTH".to_string(),
            value: raw.clone(),
            reason,
        };
        let depth: usize = raw.trim().parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
        if depth == 0 {
            return Err(invalid("depth must be positive".to_string()));
        }
        Ok(Self {
            max_chain_depth: depth,
        })
    }

    pub fn with_max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth.max(1);
        self
    }
}

/// What [`PresentationEngine::verify_vp`](crate::PresentationEngine::verify_vp)
/// enforces beyond the holder signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationPolicy {
    /// Every presented credential's subject must be the holder.
    pub require_holder_binding: bool,
    /// Run expiration and issuance-date checks on presented credentials.
    pub check_metadata: bool,
}

impl Default for PresentationPolicy {
    fn default() -> Self {
        Self {
            require_holder_binding: true,
            check_metadata: true,
        }
    }
}
