//! # Revocation Checker
//!
//! Answers "is this credential revoked?" from the issuer's resolved DID
//! Document. The decoded bitmap lives only inside [`is_revoked`] and is
//! released when that scope ends, on success and on every error path.
//!
//! A status whose revocation service is absent from the issuer's document
//! is an error, never "not revoked".

use dvc_did::{DidDocument, Service};

use crate::bitmap::RevocationBitmap;
use crate::error::RevocationError;
use crate::status::{CredentialStatus, REVOCATION_BITMAP_2022};

/// Find the `RevocationBitmap2022` service a status points at.
///
/// A service matches when its `id` equals the status `id`, or when it is a
/// relative `#fragment` that the status `id` ends with.
pub fn find_revocation_service<'a>(
    document: &'a DidDocument,
    status: &CredentialStatus,
) -> Result<&'a Service, RevocationError> {
    document
        .service
        .iter()
        .filter(|s| s.type_ == REVOCATION_BITMAP_2022)
        .find(|s| s.id == status.id || (s.id.starts_with('#') && status.id.ends_with(&s.id)))
        .ok_or_else(|| RevocationError::RevocationServiceNotFound {
            service_id: status.id.clone(),
        })
}

/// Whether the credential's bit is set in the issuer's revocation bitmap.
pub fn is_revoked(document: &DidDocument, status: &CredentialStatus) -> Result<bool, RevocationError> {
    let index = status.index()?;
    let service = find_revocation_service(document, status)?;
    let endpoint = service.endpoint_str().ok_or_else(|| {
        RevocationError::InvalidEndpoint(format!("service {} endpoint is not a string", service.id))
    })?;
    let revoked = {
        let bitmap = RevocationBitmap::from_endpoint(endpoint)?;
        bitmap.is_revoked(index)
    };
    tracing::debug!(issuer = %document.id, index, revoked, "checked revocation bitmap");
    Ok(revoked)
}

/// Validate a credential's status before asking its issuer's method to
/// revoke it. Returns the bitmap index to set.
pub fn validate_for_revoke(status: Option<&CredentialStatus>) -> Result<u32, RevocationError> {
    status
        .ok_or(RevocationError::MissingCredentialStatus)?
        .index()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dvc_core::Did;
    use serde_json::Value;

    fn issuer() -> Did {
        Did::new("did:web:issuer.example").unwrap()
    }

    fn document_with(revoked: &[u32], service_id: &str) -> DidDocument {
        let bitmap: RevocationBitmap = revoked.iter().copied().collect();
        let mut doc = DidDocument::new(issuer().as_str());
        doc.service.push(Service {
            id: service_id.to_string(),
            type_: REVOCATION_BITMAP_2022.to_string(),
            service_endpoint: Value::String(bitmap.to_endpoint().unwrap()),
        });
        doc
    }

    #[test]
    fn set_bit_is_revoked_neighbour_is_not() {
        let doc = document_with(&[5], "did:web:issuer.example#revocation");
        assert!(is_revoked(&doc, &CredentialStatus::revocation_bitmap(&issuer(), 5)).unwrap());
        assert!(!is_revoked(&doc, &CredentialStatus::revocation_bitmap(&issuer(), 6)).unwrap());
    }

    #[test]
    fn relative_service_id_matches() {
        let doc = document_with(&[2], "#revocation");
        assert!(is_revoked(&doc, &CredentialStatus::revocation_bitmap(&issuer(), 2)).unwrap());
    }

    #[test]
    fn missing_service_is_an_error() {
        let doc = DidDocument::new(issuer().as_str());
        assert_eq!(
            is_revoked(&doc, &CredentialStatus::revocation_bitmap(&issuer(), 1)),
            Err(RevocationError::RevocationServiceNotFound {
                service_id: "did:web:issuer.example#revocation".to_string()
            })
        );
    }

    #[test]
    fn service_of_other_type_does_not_match() {
        let mut doc = document_with(&[1], "did:web:issuer.example#revocation");
        doc.service[0].type_ = "LinkedDomains".to_string();
        assert!(matches!(
            is_revoked(&doc, &CredentialStatus::revocation_bitmap(&issuer(), 1)),
            Err(RevocationError::RevocationServiceNotFound { .. })
        ));
    }

    #[test]
    fn non_string_endpoint_is_invalid() {
        let mut doc = document_with(&[], "did:web:issuer.example#revocation");
        doc.service[0].service_endpoint = serde_json::json!({"origins": []});
        assert!(matches!(
            is_revoked(&doc, &CredentialStatus::revocation_bitmap(&issuer(), 1)),
            Err(RevocationError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn validate_for_revoke_requires_status_and_index() {
        assert_eq!(validate_for_revoke(None), Err(RevocationError::MissingCredentialStatus));
        let status = CredentialStatus::revocation_bitmap(&issuer(), 9);
        assert_eq!(validate_for_revoke(Some(&status)), Ok(9));

        let mut negative = status.clone();
        negative.revocation_bitmap_index = serde_json::from_value(serde_json::json!(-3)).unwrap();
        assert!(matches!(
            validate_for_revoke(Some(&negative)),
            Err(RevocationError::InvalidIndex(_))
        ));
    }
}
