//! # Credential Engine
//!
//! Builds and signs credentials. A plain credential is asserted by its
//! issuer; a delegated credential is issued by the subject of a parent
//! credential and embeds that parent verbatim.
//!
//! ## Security Invariants
//!
//! - A proof is attached exactly once, over [`VerifiableCredential::signing_input`].
//! - Delegation checks (parent proof present, claim scope, expiration not
//!   beyond the parent's) run before any signature is produced.

use std::sync::Arc;

use dvc_core::{Did, Timestamp, WireTimestamp};
use dvc_crypto::{CryptoProvider, Jwk};
use dvc_did::KEY_FRAGMENT;
use dvc_status::CredentialStatus;
use serde_json::{Map, Value};

use crate::credential::{
    ensure_plain_claims, union_dedup, CredentialSubject, VerifiableCredential, DELEGATED_CREDENTIAL,
    VC_CONTEXT_V1, VERIFIABLE_CREDENTIAL,
};
use crate::error::VcError;
use crate::proof::{Proof, ProofPurpose};
use crate::scope::check_scope;

/// Inputs for [`CredentialEngine::create_vc`].
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialParams {
    pub issuer: Did,
    pub subject: Did,
    pub claims: Map<String, Value>,
    /// Extra contexts after the W3C base context.
    pub context: Vec<String>,
    /// Extra types after `VerifiableCredential`.
    pub credential_type: Vec<String>,
    pub id: Option<String>,
    /// Defaults to now.
    pub issuance_date: Option<Timestamp>,
    pub expiration_date: Option<Timestamp>,
    /// Adds a `RevocationBitmap2022` status at this index.
    pub revocation_index: Option<u32>,
}

impl CredentialParams {
    pub fn new(issuer: Did, subject: Did) -> Self {
        Self {
            issuer,
            subject,
            claims: Map::new(),
            context: Vec::new(),
            credential_type: Vec::new(),
            id: None,
            issuance_date: None,
            expiration_date: None,
            revocation_index: None,
        }
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.claims.insert(key.into(), value);
        self
    }

    pub fn with_type(mut self, credential_type: impl Into<String>) -> Self {
        self.credential_type.push(credential_type.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_issuance_date(mut self, at: Timestamp) -> Self {
        self.issuance_date = Some(at);
        self
    }

    pub fn with_expiration(mut self, at: Timestamp) -> Self {
        self.expiration_date = Some(at);
        self
    }

    pub fn with_revocation_index(mut self, index: u32) -> Self {
        self.revocation_index = Some(index);
        self
    }
}

/// Inputs for [`CredentialEngine::create_delegated_vc`].
///
/// The issuer is not a parameter: it is always the parent's subject.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegationParams {
    pub subject: Did,
    pub claims: Map<String, Value>,
    pub context: Vec<String>,
    pub credential_type: Vec<String>,
    pub id: Option<String>,
    pub issuance_date: Option<Timestamp>,
    /// Defaults to the parent's. May only be earlier.
    pub expiration_date: Option<Timestamp>,
    pub revocation_index: Option<u32>,
}

impl DelegationParams {
    pub fn new(subject: Did) -> Self {
        Self {
            subject,
            claims: Map::new(),
            context: Vec::new(),
            credential_type: Vec::new(),
            id: None,
            issuance_date: None,
            expiration_date: None,
            revocation_index: None,
        }
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.claims.insert(key.into(), value);
        self
    }

    pub fn with_type(mut self, credential_type: impl Into<String>) -> Self {
        self.credential_type.push(credential_type.into());
        self
    }

    pub fn with_issuance_date(mut self, at: Timestamp) -> Self {
        self.issuance_date = Some(at);
        self
    }

    pub fn with_expiration(mut self, at: Timestamp) -> Self {
        self.expiration_date = Some(at);
        self
    }

    pub fn with_revocation_index(mut self, index: u32) -> Self {
        self.revocation_index = Some(index);
        self
    }
}

/// Issues credentials through a [`CryptoProvider`].
#[derive(Clone)]
pub struct CredentialEngine {
    provider: Arc<dyn CryptoProvider>,
}

impl CredentialEngine {
    pub fn new(provider: Arc<dyn CryptoProvider>) -> Self {
        Self { provider }
    }

    /// Build and sign a credential asserted by `params.issuer`.
    pub fn create_vc(&self, params: CredentialParams, issuer_key: &Jwk) -> Result<VerifiableCredential, VcError> {
        ensure_plain_claims(&params.claims)?;
        let context = union_dedup(&[VC_CONTEXT_V1.to_string()], &params.context);
        let credential_type = union_dedup(&[VERIFIABLE_CREDENTIAL.to_string()], &params.credential_type);
        let credential_status = params
            .revocation_index
            .map(|index| CredentialStatus::revocation_bitmap(&params.issuer, index));

        let vc = VerifiableCredential {
            context,
            id: params.id,
            credential_type,
            subject: params.subject.clone(),
            issuance_date: params.issuance_date.unwrap_or_else(Timestamp::now).into(),
            expiration_date: params.expiration_date.map(WireTimestamp::from),
            credential_subject: CredentialSubject::new(params.subject, params.claims),
            credential_status,
            issuer: params.issuer,
            proof: None,
        };
        let vc = self.attach_proof(vc, issuer_key, ProofPurpose::AssertionMethod)?;
        tracing::info!(issuer = %vc.issuer, subject = %vc.subject, "issued credential");
        Ok(vc)
    }

    /// Build and sign a credential that passes part of `parent`'s authority
    /// to `params.subject`, signed by the parent's subject.
    pub fn create_delegated_vc(
        &self,
        parent: &VerifiableCredential,
        params: DelegationParams,
        delegator_key: &Jwk,
    ) -> Result<VerifiableCredential, VcError> {
        if parent.proof.is_none() {
            return Err(VcError::ProofMissing {
                issuer: parent.issuer.to_string(),
            });
        }
        ensure_plain_claims(&params.claims)?;
        check_scope(&params.claims, &parent.credential_subject)?;

        let expiration_date: Option<WireTimestamp> = match (params.expiration_date, &parent.expiration_date) {
            (Some(requested), Some(limit)) if requested > limit.timestamp() => {
                return Err(VcError::ScopeViolation {
                    claim: "expirationDate".to_string(),
                });
            }
            (Some(requested), _) => Some(requested.into()),
            (None, inherited) => inherited.clone(),
        };

        let issuer = parent.subject.clone();
        let context = union_dedup(&parent.context, &params.context);
        let mut credential_type = union_dedup(&parent.credential_type, &params.credential_type);
        if !credential_type.iter().any(|t| t == DELEGATED_CREDENTIAL) {
            credential_type.push(DELEGATED_CREDENTIAL.to_string());
        }
        let credential_status = params
            .revocation_index
            .map(|index| CredentialStatus::revocation_bitmap(&issuer, index));

        let mut credential_subject = CredentialSubject::new(params.subject.clone(), params.claims);
        credential_subject.parent_vc = Some(Box::new(parent.clone()));

        let vc = VerifiableCredential {
            context,
            id: params.id,
            credential_type,
            issuer,
            subject: params.subject,
            issuance_date: params.issuance_date.unwrap_or_else(Timestamp::now).into(),
            expiration_date,
            credential_subject,
            credential_status,
            proof: None,
        };
        let vc = self.attach_proof(vc, delegator_key, ProofPurpose::Delegation)?;
        tracing::info!(
            delegator = %vc.issuer,
            delegate = %vc.subject,
            root_issuer = %parent.issuer,
            "issued delegated credential"
        );
        Ok(vc)
    }

    /// Sign an unsigned credential as `vc.issuer#keys-1`.
    ///
    /// The proof's `created` is the issuance date.
    pub fn attach_proof(
        &self,
        mut vc: VerifiableCredential,
        key: &Jwk,
        purpose: ProofPurpose,
    ) -> Result<VerifiableCredential, VcError> {
        if vc.proof.is_some() {
            return Err(VcError::MalformedInput("credential is already signed".to_string()));
        }
        let payload = vc.signing_input()?;
        let proof = Proof::sign(
            self.provider.as_ref(),
            &payload,
            key,
            vc.issuer.with_fragment(KEY_FRAGMENT),
            purpose,
            vc.issuance_date.clone(),
            None,
        )?;
        vc.proof = Some(proof);
        Ok(vc)
    }
}

impl std::fmt::Debug for CredentialEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEngine")
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}
