//! DID resolver configuration.
//!
//! Defaults suit production resolution. Override via environment variables
//! or explicit construction for tests and embedded use.

use std::time::Duration;

/// Configuration for the DID cache and the did:web resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// How long a resolved document stays in the cache.
    pub cache_ttl: Duration,
    /// Upper bound on a single did:web fetch, including the body read.
    pub web_timeout: Duration,
    /// Reject did:web documents whose `id` differs from the resolved DID.
    /// When false the mismatch is logged and the document accepted.
    pub web_strict_id: bool,
    /// Retry a failed `https` fetch once over plain `http`.
    pub web_http_fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            web_timeout: Duration::from_secs(10),
            web_strict_id: true,
            web_http_fallback: true,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DVC_DID_CACHE_TTL_SECS` (default: 300)
    /// - `DVC_DID_WEB_TIMEOUT_SECS` (default: 10)
    /// - `DVC_DID_WEB_STRICT_ID` (default: true)
    /// - `DVC_DID_WEB_HTTP_FALLBACK` (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            cache_ttl: match lookup("DVC_DID_CACHE_TTL_SECS") {
                Some(raw) => Duration::from_secs(parse_u64("DVC_DID_CACHE_TTL_SECS", &raw)?),
                None => defaults.cache_ttl,
            },
            web_timeout: match lookup("DVC_DID_WEB_TIMEOUT_SECS") {
                Some(raw) => {
                    let secs = parse_u64("DVC_DID_WEB_TIMEOUT_SECS", &raw)?;
                    if secs == 0 {
                        return Err(ConfigError::InvalidValue {
                            var: "DVC_DID_WEB_TIMEOUT_SECS".to_string(),
                            value: raw,
                            reason: "timeout must be positive".to_string(),
                        });
                    }
                    Duration::from_secs(secs)
                }
                None => defaults.web_timeout,
            },
            web_strict_id: match lookup("DVC_DID_WEB_STRICT_ID") {
                Some(raw) => parse_bool("DVC_DID_WEB_STRICT_ID", &raw)?,
                None => defaults.web_strict_id,
            },
            web_http_fallback: match lookup("DVC_DID_WEB_HTTP_FALLBACK") {
                Some(raw) => parse_bool("DVC_DID_WEB_HTTP_FALLBACK", &raw)?,
                None => defaults.web_http_fallback,
            },
        })
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_web_timeout(mut self, timeout: Duration) -> Self {
        self.web_timeout = timeout;
        self
    }

    pub fn with_web_strict_id(mut self, strict: bool) -> Self {
        self.web_strict_id = strict;
        self
    }

    pub fn with_web_http_fallback(mut self, fallback: bool) -> Self {
        self.web_http_fallback = fallback;
        self
    }
}

fn parse_u64(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
        var: var.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },
}
