//! # Canonical Payload Vectors
//!
//! Fixed inputs with their expected canonical strings. Any verifier that
//! implements the same scheme must produce these bytes, so a change here is
//! a wire-compatibility break.

use dvc_core::{canonicalize, CanonicalBytes, Did, Timestamp};

#[test]
fn credential_shaped_payload() {
    let payload = serde_json::json!({
        "type": ["VerifiableCredential"],
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "issuer": "did:web:issuer.example",
        "subject": "did:web:holder.example",
        "issuanceDate": "2026-01-15T12:00:00Z",
        "credentialSubject": {
            "role": "admin",
            "id": "did:web:holder.example",
            "permissions": {"write": true, "read": true}
        }
    });

    assert_eq!(
        canonicalize(&payload).unwrap(),
        concat!(
            r#"{"@context":["https://www.w3.org/2018/credentials/v1"],"#,
            r#""credentialSubject":{"id":"did:web:holder.example","permissions":{"read":true,"write":true},"role":"admin"},"#,
            r#""issuanceDate":"2026-01-15T12:00:00Z","issuer":"did:web:issuer.example","#,
            r#""subject":"did:web:holder.example","type":["VerifiableCredential"]}"#
        )
    );
}

#[test]
fn typed_values_canonicalize_like_their_json() {
    #[derive(serde::Serialize)]
    struct Envelope {
        zeta: Did,
        alpha: Timestamp,
    }

    let typed = Envelope {
        zeta: Did::new("did:key:z6MkTest").unwrap(),
        alpha: Timestamp::parse("2026-03-01T10:30:00Z").unwrap(),
    };
    let untyped = serde_json::json!({
        "alpha": "2026-03-01T10:30:00Z",
        "zeta": "did:key:z6MkTest"
    });

    assert_eq!(
        CanonicalBytes::new(&typed).unwrap(),
        CanonicalBytes::new(&untyped).unwrap()
    );
}

#[test]
fn strings_are_escaped_per_json() {
    let s = canonicalize(&serde_json::json!({"q": "a\"b\\c\n"})).unwrap();
    assert_eq!(s, r#"{"q":"a\"b\\c\n"}"#);
}
