//! # Verifiable Presentations
//!
//! A holder wraps credentials in a presentation and signs it together with
//! a verifier-supplied nonce (`challenge`). The signature shows the holder
//! controls its DID now; the challenge stops a captured presentation from
//! being replayed to another verifier or later.

use std::sync::Arc;

use dvc_core::{CanonicalBytes, Did, Timestamp};
use dvc_crypto::{CryptoProvider, Jwk};
use dvc_did::KEY_FRAGMENT;
use serde::{Deserialize, Serialize};

use crate::config::PresentationPolicy;
use crate::credential::{VerifiableCredential, VC_CONTEXT_V1};
use crate::error::VcError;
use crate::proof::{Proof, ProofPurpose};
use crate::validator::ChainValidator;

/// Base type of every presentation.
pub const VERIFIABLE_PRESENTATION: &str = "VerifiablePresentation";

/// A W3C Verifiable Presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifiablePresentation {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    #[serde(rename = "type")]
    pub presentation_type: Vec<String>,

    #[serde(rename = "verifiableCredential")]
    pub verifiable_credential: Vec<VerifiableCredential>,

    pub holder: Did,

    pub challenge: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VerifiablePresentation {
    /// Canonical bytes of the presentation without its `proof`.
    pub fn signing_input(&self) -> Result<CanonicalBytes, VcError> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("proof");
        }
        Ok(CanonicalBytes::from_value(value)?)
    }
}

/// Builds and verifies presentations.
#[derive(Clone)]
pub struct PresentationEngine {
    provider: Arc<dyn CryptoProvider>,
    validator: ChainValidator,
}

impl PresentationEngine {
    pub fn new(provider: Arc<dyn CryptoProvider>, validator: ChainValidator) -> Self {
        Self { provider, validator }
    }

    /// Wrap `credentials` for `holder` and sign with the holder's key.
    pub fn create_vp(
        &self,
        credentials: Vec<VerifiableCredential>,
        holder: &Did,
        challenge: &str,
        holder_key: &Jwk,
    ) -> Result<VerifiablePresentation, VcError> {
        if credentials.is_empty() {
            return Err(VcError::MalformedInput("presentation carries no credentials".to_string()));
        }
        let mut vp = VerifiablePresentation {
            context: vec![VC_CONTEXT_V1.to_string()],
            presentation_type: vec![VERIFIABLE_PRESENTATION.to_string()],
            verifiable_credential: credentials,
            holder: holder.clone(),
            challenge: challenge.to_string(),
            proof: None,
        };
        let payload = vp.signing_input()?;
        vp.proof = Some(Proof::sign(
            self.provider.as_ref(),
            &payload,
            holder_key,
            holder.with_fragment(KEY_FRAGMENT),
            ProofPurpose::Authentication,
            Timestamp::now().into(),
            Some(challenge.to_string()),
        )?);
        tracing::info!(holder = %holder, credentials = vp.verifiable_credential.len(), "created presentation");
        Ok(vp)
    }

    /// Verify the holder's signature over `vp`, its challenge, and every
    /// credential it carries.
    pub async fn verify_vp(
        &self,
        vp: &VerifiablePresentation,
        expected_challenge: &str,
        policy: &PresentationPolicy,
    ) -> Result<(), VcError> {
        let proof = vp.proof.as_ref().ok_or_else(|| VcError::ProofMissing {
            issuer: vp.holder.to_string(),
        })?;
        if vp.challenge != expected_challenge {
            return Err(VcError::ChallengeMismatch {
                expected: expected_challenge.to_string(),
                actual: vp.challenge.clone(),
            });
        }
        if proof.challenge.as_deref() != Some(expected_challenge) {
            return Err(VcError::ChallengeMismatch {
                expected: expected_challenge.to_string(),
                actual: proof.challenge.clone().unwrap_or_default(),
            });
        }
        if proof.proof_purpose != ProofPurpose::Authentication {
            return Err(VcError::ProofPurposeMismatch {
                expected: ProofPurpose::Authentication.to_string(),
                actual: proof.proof_purpose.to_string(),
            });
        }
        if vp.verifiable_credential.is_empty() {
            return Err(VcError::MalformedInput("presentation carries no credentials".to_string()));
        }

        let (_, holder_key) = self.validator.resolve_key(&vp.holder, proof).await?;
        proof.verify(self.provider.as_ref(), &vp.signing_input()?, &holder_key)?;

        if policy.require_holder_binding {
            if let Some(foreign) = vp.verifiable_credential.iter().find(|vc| vc.subject != vp.holder) {
                return Err(VcError::HolderMismatch {
                    holder: vp.holder.to_string(),
                    subject: foreign.subject.to_string(),
                });
            }
        }

        for vc in &vp.verifiable_credential {
            self.validator.verify_vc(vc, policy.check_metadata).await?;
        }
        tracing::info!(holder = %vp.holder, credentials = vp.verifiable_credential.len(), "presentation verified");
        Ok(())
    }
}

impl std::fmt::Debug for PresentationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationEngine")
            .field("provider", &self.provider.provider_name())
            .field("validator", &self.validator)
            .finish()
    }
}
