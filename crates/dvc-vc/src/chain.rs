//! # Delegation Chain
//!
//! A delegated credential nests its parent, which may nest its own parent,
//! down to an undelegated root. [`DelegationChain`] flattens that nesting
//! into a bounded list of borrowed nodes, leaf first, so validation walks a
//! slice instead of recursing through the object graph.

use crate::credential::VerifiableCredential;
use crate::error::VcError;

/// The credentials of a chain, ordered leaf to root.
#[derive(Debug, Clone)]
pub struct DelegationChain<'a> {
    nodes: Vec<&'a VerifiableCredential>,
}

impl<'a> DelegationChain<'a> {
    /// Flatten the chain ending at `leaf`.
    ///
    /// Fails with `ChainTooDeep` if it holds more than `max_depth`
    /// credentials. The walk stops at the bound, so an arbitrarily deep
    /// input costs at most `max_depth` steps.
    pub fn from_leaf(leaf: &'a VerifiableCredential, max_depth: usize) -> Result<Self, VcError> {
        let mut nodes = Vec::with_capacity(max_depth.min(16));
        let mut current = Some(leaf);
        while let Some(vc) = current {
            if nodes.len() == max_depth {
                return Err(VcError::ChainTooDeep { max_depth });
            }
            nodes.push(vc);
            current = vc.parent();
        }
        Ok(Self { nodes })
    }

    /// Number of credentials, leaf and root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: a chain holds at least its leaf.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf(&self) -> &'a VerifiableCredential {
        self.nodes[0]
    }

    /// The undelegated credential at the base of the chain.
    pub fn root(&self) -> &'a VerifiableCredential {
        self.nodes[self.nodes.len() - 1]
    }

    /// Leaf to root.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a VerifiableCredential> + '_ {
        self.nodes.iter().copied()
    }

    /// `(child, parent)` pairs, leaf side first.
    pub fn links(&self) -> impl DoubleEndedIterator<Item = (&'a VerifiableCredential, &'a VerifiableCredential)> + '_ {
        self.nodes.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn vc(issuer: &str, subject: &str, parent: Option<Value>) -> Value {
        let mut subject_obj = json!({"id": subject});
        if let Some(p) = parent {
            subject_obj["parentVC"] = p;
        }
        json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiableCredential"],
            "issuer": issuer,
            "subject": subject,
            "issuanceDate": "2026-01-01T00:00:00Z",
            "credentialSubject": subject_obj
        })
    }

    fn nested(depth: usize) -> VerifiableCredential {
        let mut value = vc("did:mem:n0", "did:mem:n1", None);
        for i in 1..depth {
            value = vc(&format!("did:mem:n{i}"), &format!("did:mem:n{}", i + 1), Some(value));
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn single_credential_is_its_own_root() {
        let leaf = nested(1);
        let chain = DelegationChain::from_leaf(&leaf, 16).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.leaf(), chain.root());
        assert_eq!(chain.links().count(), 0);
    }

    #[test]
    fn flattens_leaf_to_root() {
        let leaf = nested(3);
        let chain = DelegationChain::from_leaf(&leaf, 16).unwrap();
        let issuers: Vec<&str> = chain.iter().map(|c| c.issuer.as_str()).collect();
        assert_eq!(issuers, vec!["did:mem:n2", "did:mem:n1", "did:mem:n0"]);
        assert_eq!(chain.root().issuer.as_str(), "did:mem:n0");

        let links: Vec<(&str, &str)> = chain
            .links()
            .map(|(child, parent)| (child.issuer.as_str(), parent.subject.as_str()))
            .collect();
        assert_eq!(links, vec![("did:mem:n2", "did:mem:n2"), ("did:mem:n1", "did:mem:n1")]);
    }

    #[test]
    fn depth_bound_is_inclusive() {
        let leaf = nested(4);
        assert_eq!(DelegationChain::from_leaf(&leaf, 4).unwrap().len(), 4);
        assert_eq!(
            DelegationChain::from_leaf(&leaf, 3).unwrap_err(),
            VcError::ChainTooDeep { max_depth: 3 }
        );
    }
}
