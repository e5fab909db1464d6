//! # Delegation Scope
//!
//! A delegate may only receive claims its delegator holds. For each claim
//! key the child's value must be a *structural subset* of the parent's:
//!
//! - objects: every key in the child exists in the parent with a value
//!   that is itself a structural subset;
//! - arrays and primitives: equal.
//!
//! The rule is checked at creation, before signing, and again for every
//! link during chain verification.

use serde_json::{Map, Value};

use crate::credential::CredentialSubject;
use crate::error::VcError;

/// Whether `child` is contained in `parent`.
pub fn is_structural_subset(child: &Value, parent: &Value) -> bool {
    match (child, parent) {
        (Value::Object(c), Value::Object(p)) => c
            .iter()
            .all(|(key, cv)| p.get(key).is_some_and(|pv| is_structural_subset(cv, pv))),
        _ => child == parent,
    }
}

/// Check every delegated claim against the delegator's subject.
pub fn check_scope(claims: &Map<String, Value>, parent: &CredentialSubject) -> Result<(), VcError> {
    for (key, value) in claims {
        let within = parent
            .claims
            .get(key)
            .is_some_and(|granted| is_structural_subset(value, granted));
        if !within {
            tracing::debug!(claim = %key, delegator = %parent.id, "claim outside delegator scope");
            return Err(VcError::ScopeViolation { claim: key.clone() });
        }
    }
    Ok(())
}
