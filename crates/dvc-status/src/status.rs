//! # Credential Status
//!
//! The `credentialStatus` member of a credential:
//! `{id, type: "RevocationBitmap2022", revocationBitmapIndex}`.
//!
//! The status is part of the signed payload, so it must re-serialize to the
//! exact bytes it was received as. The index keeps its wire form (JSON
//! number or numeric string) and unknown members are carried through.

use dvc_core::Did;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RevocationError;

/// Status type string for bitmap revocation.
pub const REVOCATION_BITMAP_2022: &str = "RevocationBitmap2022";

/// Fragment of the issuer's revocation service.
pub const REVOCATION_SERVICE_FRAGMENT: &str = "revocation";

/// A credential's pointer into its issuer's revocation bitmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub revocation_bitmap_index: RevocationIndex,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `revocationBitmapIndex` as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RevocationIndex {
    Number(serde_json::Number),
    Text(String),
}

impl RevocationIndex {
    /// The index as a bitmap position.
    ///
    /// Fails for negative, fractional, non-numeric, or out-of-range values.
    pub fn to_u32(&self) -> Result<u32, RevocationError> {
        let parsed = match self {
            Self::Number(n) => n.as_u64(),
            Self::Text(s) => s.parse::<u64>().ok(),
        };
        parsed
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| RevocationError::InvalidIndex(self.to_string()))
    }
}

impl From<u32> for RevocationIndex {
    fn from(index: u32) -> Self {
        Self::Number(index.into())
    }
}

impl std::fmt::Display for RevocationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl CredentialStatus {
    /// A `RevocationBitmap2022` status pointing at `issuer#revocation`.
    pub fn revocation_bitmap(issuer: &Did, index: u32) -> Self {
        Self {
            id: issuer.with_fragment(REVOCATION_SERVICE_FRAGMENT),
            type_: REVOCATION_BITMAP_2022.to_string(),
            revocation_bitmap_index: index.into(),
            extra: Map::new(),
        }
    }

    /// The bitmap index, after checking the status type.
    pub fn index(&self) -> Result<u32, RevocationError> {
        if self.type_ != REVOCATION_BITMAP_2022 {
            return Err(RevocationError::UnsupportedStatusType(self.type_.clone()));
        }
        self.revocation_bitmap_index.to_u32()
    }
}
