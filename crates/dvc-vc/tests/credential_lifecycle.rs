//! Issue, verify, tamper with, expire, and revoke single credentials.

mod common;

use common::{Fixture, Identity};
use dvc_core::{Did, Timestamp};
use dvc_crypto::Ed25519KeyPair;
use dvc_vc::{revoke_credential, CredentialParams, ProofPurpose, VcError, VerifiableCredential};
use serde_json::json;

async fn issue(fx: &Fixture, issuer: &Identity, subject: &Did, index: Option<u32>) -> VerifiableCredential {
    let mut params = CredentialParams::new(issuer.did.clone(), subject.clone())
        .with_claim("role", json!("auditor"))
        .with_claim("scope", json!({"region": "eu", "level": 2}))
        .with_expiration(Timestamp::now().offset_secs(3_600));
    if let Some(index) = index {
        params = params.with_revocation_index(index);
    }
    fx.engine.create_vc(params, &issuer.key).unwrap()
}

#[tokio::test]
async fn issued_credential_verifies() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;

    let vc = issue(&fx, &issuer, &holder.did, Some(0)).await;
    fx.validator.verify_vc(&vc, true).await.unwrap();
}

#[tokio::test]
async fn did_key_issuer_verifies_from_multibase() {
    let fx = Fixture::new();
    let issuer = fx.key_identity().await;
    let holder = fx.key_identity().await;

    let vc = issue(&fx, &issuer, &holder.did, None).await;
    fx.validator.verify_vc(&vc, true).await.unwrap();
}

#[tokio::test]
async fn secp256k1_issuer_verifies() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity_k1().await;
    let holder = fx.key_identity().await;

    let vc = issue(&fx, &issuer, &holder.did, Some(1)).await;
    fx.validator.verify_vc(&vc, true).await.unwrap();
}

#[tokio::test]
async fn credential_survives_json_transport() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;

    let vc = issue(&fx, &issuer, &holder.did, Some(4)).await;
    let wire = serde_json::to_string_pretty(&vc).unwrap();
    let received = VerifiableCredential::from_json(&wire).unwrap();
    assert_eq!(received, vc);
    fx.validator.verify_vc(&received, true).await.unwrap();
}

#[tokio::test]
async fn millisecond_and_offset_dates_verify_as_written() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;

    let unsigned = VerifiableCredential::from_json(
        &json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiableCredential"],
            "issuer": issuer.did.as_str(),
            "subject": holder.did.as_str(),
            "issuanceDate": "2025-01-15T12:00:00.123Z",
            "expirationDate": "2099-12-31T23:59:59.999+01:00",
            "credentialSubject": {"id": holder.did.as_str(), "role": "auditor"}
        })
        .to_string(),
    )
    .unwrap();
    let vc = fx
        .engine
        .attach_proof(unsigned, &issuer.key, ProofPurpose::AssertionMethod)
        .unwrap();

    let wire = serde_json::to_string(&vc).unwrap();
    assert!(wire.contains("\"2025-01-15T12:00:00.123Z\""));
    assert!(wire.contains("\"2099-12-31T23:59:59.999+01:00\""));

    let received = VerifiableCredential::from_json(&wire).unwrap();
    fx.validator.verify_vc(&received, true).await.unwrap();
}

#[tokio::test]
async fn payload_mutations_break_the_signature() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;
    let other = fx.key_identity().await;
    let vc = issue(&fx, &issuer, &holder.did, None).await;

    let mut claim = vc.clone();
    claim.credential_subject.claims.insert("role".to_string(), json!("admin"));

    let mut nested = vc.clone();
    nested.credential_subject.claims.insert("scope".to_string(), json!({"region": "eu", "level": 3}));

    let mut subject = vc.clone();
    subject.subject = other.did.clone();

    let mut expiry = vc.clone();
    expiry.expiration_date = Some(Timestamp::now().offset_secs(86_400 * 365).into());

    let mut context = vc.clone();
    context.context.push("https://example.org/extra/v1".to_string());

    for tampered in [claim, nested, subject, expiry, context] {
        assert!(matches!(
            fx.validator.verify_vc(&tampered, true).await,
            Err(VcError::SignatureInvalid { .. })
        ));
    }
}

#[tokio::test]
async fn expired_credential_is_rejected_only_with_metadata_checks() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;
    let now = Timestamp::now();

    let params = CredentialParams::new(issuer.did.clone(), holder.did.clone())
        .with_issuance_date(now.offset_secs(-7_200))
        .with_expiration(now.offset_secs(-3_600));
    let vc = fx.engine.create_vc(params, &issuer.key).unwrap();

    assert!(matches!(fx.validator.verify_vc(&vc, true).await, Err(VcError::Expired { .. })));
    fx.validator.verify_vc(&vc, false).await.unwrap();
}

#[tokio::test]
async fn future_credential_is_not_yet_valid() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;

    let params = CredentialParams::new(issuer.did.clone(), holder.did.clone())
        .with_issuance_date(Timestamp::now().offset_secs(3_600));
    let vc = fx.engine.create_vc(params, &issuer.key).unwrap();

    assert!(matches!(fx.validator.verify_vc(&vc, true).await, Err(VcError::NotYetValid { .. })));
    fx.validator.verify_vc(&vc, false).await.unwrap();
}

#[tokio::test]
async fn revoked_index_fails_and_neighbour_passes() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;

    let five = issue(&fx, &issuer, &holder.did, Some(5)).await;
    let six = issue(&fx, &issuer, &holder.did, Some(6)).await;
    fx.validator.verify_vc(&five, true).await.unwrap();

    revoke_credential(&fx.registry, &five, &issuer.key).await.unwrap();

    assert_eq!(
        fx.validator.verify_vc(&five, true).await,
        Err(VcError::Revoked {
            issuer: issuer.did.to_string(),
            index: 5,
        })
    );
    fx.validator.verify_vc(&six, true).await.unwrap();
}

#[tokio::test]
async fn revocation_needs_the_issuer_key() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;
    let vc = issue(&fx, &issuer, &holder.did, Some(2)).await;

    let intruder = Ed25519KeyPair::generate().to_jwk();
    assert!(matches!(
        revoke_credential(&fx.registry, &vc, &intruder).await,
        Err(VcError::Did(_))
    ));
    fx.validator.verify_vc(&vc, true).await.unwrap();
}

#[tokio::test]
async fn revoking_without_status_is_malformed() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;
    let vc = issue(&fx, &issuer, &holder.did, None).await;

    assert!(matches!(
        revoke_credential(&fx.registry, &vc, &issuer.key).await,
        Err(VcError::MalformedInput(_))
    ));
}

#[tokio::test]
async fn did_key_cannot_revoke() {
    let fx = Fixture::new();
    let issuer = fx.key_identity().await;
    let holder = fx.key_identity().await;
    let vc = issue(&fx, &issuer, &holder.did, Some(1)).await;

    assert!(matches!(
        revoke_credential(&fx.registry, &vc, &issuer.key).await,
        Err(VcError::NotImplemented { .. })
    ));
}

#[tokio::test]
async fn status_without_revocation_service_is_an_error() {
    let fx = Fixture::new();
    let issuer = fx.key_identity().await;
    let holder = fx.key_identity().await;
    let vc = issue(&fx, &issuer, &holder.did, Some(1)).await;

    assert_eq!(
        fx.validator.verify_vc(&vc, true).await,
        Err(VcError::RevocationServiceNotFound {
            service_id: issuer.did.with_fragment("revocation"),
        })
    );
}

#[tokio::test]
async fn unsigned_credential_is_proof_missing() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;
    let mut vc = issue(&fx, &issuer, &holder.did, None).await;
    vc.proof = None;

    assert!(matches!(fx.validator.verify_vc(&vc, true).await, Err(VcError::ProofMissing { .. })));
}

#[tokio::test]
async fn unknown_verification_method_is_key_not_found() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;
    let mut vc = issue(&fx, &issuer, &holder.did, None).await;
    let proof = vc.proof.as_mut().unwrap();
    proof.verification_method = issuer.did.with_fragment("keys-2");

    assert_eq!(
        fx.validator.verify_vc(&vc, true).await,
        Err(VcError::KeyNotFound {
            verification_method: issuer.did.with_fragment("keys-2"),
        })
    );
}

#[tokio::test]
async fn unregistered_method_passes_through() {
    let fx = Fixture::new();
    let issuer = Identity {
        did: Did::new("did:ion:EiAnonymous").unwrap(),
        key: Ed25519KeyPair::generate().to_jwk(),
    };
    let holder = fx.key_identity().await;
    let vc = issue(&fx, &issuer, &holder.did, None).await;

    assert_eq!(
        fx.validator.verify_vc(&vc, true).await,
        Err(VcError::UnknownDidMethod("ion".to_string()))
    );
}

#[tokio::test]
async fn missing_ledger_did_is_unresolvable() {
    let fx = Fixture::new();
    let issuer = Identity {
        did: Did::new("did:mem:never-published").unwrap(),
        key: Ed25519KeyPair::generate().to_jwk(),
    };
    let holder = fx.key_identity().await;
    let vc = issue(&fx, &issuer, &holder.did, None).await;

    assert!(matches!(
        fx.validator.verify_vc(&vc, true).await,
        Err(VcError::UnresolvableIssuer { .. })
    ));
}

#[tokio::test]
async fn key_chain_ignores_revocation_and_expiry() {
    let fx = Fixture::new();
    let issuer = fx.ledger_identity().await;
    let holder = fx.key_identity().await;
    let now = Timestamp::now();

    let params = CredentialParams::new(issuer.did.clone(), holder.did.clone())
        .with_issuance_date(now.offset_secs(-7_200))
        .with_expiration(now.offset_secs(-3_600))
        .with_revocation_index(9);
    let vc = fx.engine.create_vc(params, &issuer.key).unwrap();
    revoke_credential(&fx.registry, &vc, &issuer.key).await.unwrap();

    assert!(fx.validator.verify_vc(&vc, false).await.is_err());
    let chain = fx.validator.get_issuer_key_chain(&vc).await.unwrap();
    assert_eq!(chain.root_subject, holder.did);
    assert_eq!(chain.signers.len(), 1);
    assert_eq!(chain.signers[0].issuer, issuer.did);
    assert_eq!(chain.leaf_key(), Some(&issuer.key.public()));
}
