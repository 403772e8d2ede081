//! Ancestor reconciliation for search results.
//!
//! A search returns matches scattered across the tree. To render them as a
//! tree, every ancestor on each match's path must be present as well.

use std::collections::{BTreeSet, HashSet};

use crate::domain::entities::{Node, TreeId};
use crate::domain::error::DomainError;
use crate::domain::path::PathCodec;

#[derive(Debug, Clone, Copy, Default)]
pub struct AncestorReconciler {
    codec: PathCodec,
}

impl AncestorReconciler {
    pub fn new(codec: PathCodec) -> Self {
        Self { codec }
    }

    /// Ancestor ids referenced by `nodes` that are not among `nodes`.
    pub fn missing_ancestors<I: TreeId>(&self, nodes: &[Node<I>]) -> Result<BTreeSet<I>, DomainError> {
        let present: HashSet<&I> = nodes.iter().map(|n| &n.id).collect();

        let mut missing = BTreeSet::new();
        for node in nodes {
            for ancestor in self.codec.decode_ids::<I>(node.path_str())? {
                if !present.contains(&ancestor) {
                    missing.insert(ancestor);
                }
            }
        }
        Ok(missing)
    }

    /// Append `ancestors` to `nodes`, skipping ids already present.
    pub fn merge<I: TreeId>(&self, mut nodes: Vec<Node<I>>, ancestors: Vec<Node<I>>) -> Vec<Node<I>> {
        let mut seen: HashSet<I> = nodes.iter().map(|n| n.id.clone()).collect();
        for ancestor in ancestors {
            if seen.insert(ancestor.id.clone()) {
                nodes.push(ancestor);
            }
        }
        nodes
    }
}
