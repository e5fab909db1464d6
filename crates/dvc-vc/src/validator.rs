//! # Delegation Chain Validator
//!
//! Verifies a credential and every parent embedded beneath it.
//!
//! ## Order of checks
//!
//! Each credential, leaf first, must pass in turn:
//!
//! 1. proof present (`ProofMissing`);
//! 2. issuer resolves through the registry (`UnresolvableIssuer`);
//! 3. `proof.verificationMethod` names a key in the issuer's document
//!    (`KeyNotFound`);
//! 4. the signature verifies over the canonical payload (`SignatureInvalid`);
//! 5. its revocation bit is clear, when it has a status (`Revoked`);
//! 6. when metadata checks are on, it is neither expired nor issued in the
//!    future (`Expired`, `NotYetValid`).
//!
//! Only once every credential has passed are the links between them checked,
//! root side first: each parent's subject must be its child's issuer
//! (`ParentInvalid`) and each child's claims must lie within its parent's
//! (`ScopeViolation`). A parent's authority over its child is therefore
//! confirmed only after the parent itself verifies.
//!
//! Verification is sequential and stops at the first failure.

use std::sync::Arc;

use dvc_core::{Did, Timestamp};
use dvc_crypto::{CryptoProvider, Jwk};
use dvc_did::{DidDocument, DidError, DidRegistry};
use dvc_status::is_revoked;

use crate::chain::DelegationChain;
use crate::config::ValidatorConfig;
use crate::credential::VerifiableCredential;
use crate::error::VcError;
use crate::proof::Proof;
use crate::scope::check_scope;

/// Which liveness checks a chain walk performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Checks {
    revocation: bool,
    metadata: bool,
}

/// A signer identified while walking a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedSigner {
    pub issuer: Did,
    pub verification_method: String,
    pub public_key: Jwk,
}

/// Signers of a chain and the subject of its root credential.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuerKeyChain {
    /// Leaf signer first.
    pub signers: Vec<VerifiedSigner>,
    pub root_subject: Did,
}

impl IssuerKeyChain {
    /// The key that signed the leaf credential.
    pub fn leaf_key(&self) -> Option<&Jwk> {
        self.signers.first().map(|s| &s.public_key)
    }
}

/// Verifies credentials and their delegation chains.
#[derive(Clone)]
pub struct ChainValidator {
    registry: Arc<DidRegistry>,
    provider: Arc<dyn CryptoProvider>,
    config: ValidatorConfig,
}

impl ChainValidator {
    pub fn new(registry: Arc<DidRegistry>, provider: Arc<dyn CryptoProvider>, config: ValidatorConfig) -> Self {
        Self {
            registry,
            provider,
            config,
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<DidRegistry> {
        &self.registry
    }

    pub(crate) fn provider(&self) -> &dyn CryptoProvider {
        self.provider.as_ref()
    }

    /// Verify `vc` and its whole delegation chain as of now.
    pub async fn verify_vc(&self, vc: &VerifiableCredential, check_metadata: bool) -> Result<(), VcError> {
        self.verify_vc_at(vc, check_metadata, Timestamp::now()).await
    }

    /// Verify `vc` with `now` as the reference time for metadata checks.
    pub async fn verify_vc_at(
        &self,
        vc: &VerifiableCredential,
        check_metadata: bool,
        now: Timestamp,
    ) -> Result<(), VcError> {
        let checks = Checks {
            revocation: true,
            metadata: check_metadata,
        };
        let signers = self.walk(vc, checks, now).await?;
        tracing::info!(issuer = %vc.issuer, subject = %vc.subject, depth = signers.len(), "credential verified");
        Ok(())
    }

    /// Identify the signers of `vc` and its chain without liveness checks.
    ///
    /// Signatures and the authority and scope of every link are enforced.
    /// Revocation and validity dates are not, so historical credentials
    /// still yield their signers.
    pub async fn get_issuer_key_chain(&self, vc: &VerifiableCredential) -> Result<IssuerKeyChain, VcError> {
        let checks = Checks {
            revocation: false,
            metadata: false,
        };
        let signers = self.walk(vc, checks, Timestamp::now()).await?;
        let chain = DelegationChain::from_leaf(vc, self.config.max_chain_depth)?;
        Ok(IssuerKeyChain {
            signers,
            root_subject: chain.root().subject.clone(),
        })
    }

    async fn walk(
        &self,
        vc: &VerifiableCredential,
        checks: Checks,
        now: Timestamp,
    ) -> Result<Vec<VerifiedSigner>, VcError> {
        let chain = DelegationChain::from_leaf(vc, self.config.max_chain_depth)?;

        let mut signers = Vec::with_capacity(chain.len());
        for (depth, node) in chain.iter().enumerate() {
            signers.push(self.verify_node(node, depth, checks, now).await?);
        }

        for (child, parent) in chain.links().rev() {
            check_link(child, parent)?;
        }
        Ok(signers)
    }

    async fn verify_node(
        &self,
        vc: &VerifiableCredential,
        depth: usize,
        checks: Checks,
        now: Timestamp,
    ) -> Result<VerifiedSigner, VcError> {
        let proof = vc.proof.as_ref().ok_or_else(|| VcError::ProofMissing {
            issuer: vc.issuer.to_string(),
        })?;
        let (document, public_key) = self.resolve_key(&vc.issuer, proof).await?;
        proof.verify(self.provider(), &vc.signing_input()?, &public_key)?;

        if checks.revocation {
            if let Some(status) = &vc.credential_status {
                if is_revoked(&document, status)? {
                    return Err(VcError::Revoked {
                        issuer: vc.issuer.to_string(),
                        index: status.index()?,
                    });
                }
            }
        }

        if checks.metadata {
            check_dates(vc, now)?;
        }

        tracing::debug!(issuer = %vc.issuer, depth, "chain node verified");
        Ok(VerifiedSigner {
            issuer: vc.issuer.clone(),
            verification_method: proof.verification_method.clone(),
            public_key,
        })
    }

    /// Resolve `did` and return its document with the public key `proof`
    /// names.
    pub(crate) async fn resolve_key(&self, did: &Did, proof: &Proof) -> Result<(DidDocument, Jwk), VcError> {
        let document = self.registry.resolve(did).await.map_err(|e| match e {
            DidError::UnknownDidMethod(_) | DidError::ResolutionTimeout { .. } => VcError::from(e),
            other => VcError::UnresolvableIssuer {
                issuer: did.to_string(),
                reason: other.to_string(),
            },
        })?;
        let method = document
            .find_verification_method(&proof.verification_method)
            .ok_or_else(|| VcError::KeyNotFound {
                verification_method: proof.verification_method.clone(),
            })?;
        let public_key = method.resolve_jwk()?;
        Ok((document, public_key))
    }
}

impl std::fmt::Debug for ChainValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainValidator")
            .field("registry", &self.registry)
            .field("provider", &self.provider.provider_name())
            .field("config", &self.config)
            .finish()
    }
}

fn check_dates(vc: &VerifiableCredential, now: Timestamp) -> Result<(), VcError> {
    if let Some(expiration) = &vc.expiration_date {
        if expiration.timestamp() < now {
            return Err(VcError::Expired {
                expired_at: expiration.to_string(),
            });
        }
    }
    if vc.issuance_date.timestamp() > now {
        return Err(VcError::NotYetValid {
            valid_from: vc.issuance_date.to_string(),
        });
    }
    Ok(())
}

/// Authority continuity and scope narrowing between a child and its parent.
fn check_link(child: &VerifiableCredential, parent: &VerifiableCredential) -> Result<(), VcError> {
    if parent.subject != child.issuer {
        return Err(VcError::ParentInvalid {
            issuer: child.issuer.to_string(),
            parent_subject: parent.subject.to_string(),
        });
    }
    check_scope(&child.credential_subject.claims, &parent.credential_subject)
}
