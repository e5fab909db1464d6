//! # Credential Dates — Instants and Wire Text
//!
//! `issuanceDate`, `expirationDate` and `proof.created` sit inside the
//! signed payload, so their textual form is part of what gets signed.
//!
//! - [`Timestamp`] is a UTC instant used for ordering and validity checks.
//!   It accepts any RFC 3339 date, with fractional seconds or an offset.
//! - [`WireTimestamp`] is a date as it appeared in a credential: the text
//!   plus the instant it denotes.
//!
//! ## Security Invariant
//!
//! A [`WireTimestamp`] serializes back to exactly the text it was read
//! from. A received `2026-01-15T12:00:00.123Z` or `2026-01-15T13:00:00+01:00`
//! is never rewritten into another spelling, so the verifier re-derives the
//! bytes the issuer signed. Dates minted here use `YYYY-MM-DDTHH:MM:SSZ`.

use chrono::{DateTime, Duration, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A point in time, UTC. Ordered and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current second.
    pub fn now() -> Self {
        let now = Utc::now();
        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    /// Parse an RFC 3339 date, normalizing its offset to UTC.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidTimestamp`] unless `s` is RFC 3339.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        DateTime::parse_from_rfc3339(s)
            .map(|parsed| Self(parsed.with_timezone(&Utc)))
            .map_err(|e| ValidationError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Shift by `secs` (negative moves into the past), clamping at the ends
    /// of the representable range.
    pub fn offset_secs(&self, secs: i64) -> Self {
        let limit = if secs < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        };
        let moved = Duration::try_seconds(secs)
            .and_then(|d| self.0.checked_add_signed(d))
            .unwrap_or(limit);
        Self(moved)
    }

    /// UTC with a `Z` designator. Whole seconds print without a fraction.
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A credential date exactly as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WireTimestamp {
    raw: String,
    at: Timestamp,
}

impl WireTimestamp {
    /// Keep `raw` verbatim after checking that it is RFC 3339.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let at = Timestamp::parse(&raw)?;
        Ok(Self { raw, at })
    }

    /// The instant the text denotes.
    pub fn timestamp(&self) -> Timestamp {
        self.at
    }

    /// The wire text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<Timestamp> for WireTimestamp {
    fn from(at: Timestamp) -> Self {
        Self {
            raw: at.to_iso8601(),
            at,
        }
    }
}

impl std::fmt::Display for WireTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for WireTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for WireTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}
