//! Ancestor Precomputation
//!
//! Walks the product forest once and records, for every node, the names of its
//! ancestors from the root down to the immediate parent. The walk uses an explicit
//! stack, so catalogue depth is bounded by memory rather than call depth.

use crate::tree::Tree;
use crate::types::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, warn};

/// One product with its ancestor chain resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecomputedRecord {
    pub id: ProductId,
    pub name: String,
    pub parent_id: Option<ProductId>,
    /// Ancestor names in root-to-parent order. Empty for roots.
    pub ancestors: Vec<String>,
}

/// Full precomputation result keyed by product id.
///
/// Serializes as a JSON object whose keys are the decimal ids, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrecomputedCatalogue {
    records: BTreeMap<ProductId, PrecomputedRecord>,
}

impl PrecomputedCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: PrecomputedRecord) {
        self.records.insert(record.id, record);
    }

    pub fn get(&self, id: ProductId) -> Option<&PrecomputedRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &PrecomputedRecord> {
        self.records.values()
    }

    /// Owned records in ascending id order, the order windows are cut from.
    pub fn to_ordered_vec(&self) -> Vec<PrecomputedRecord> {
        self.records.values().cloned().collect()
    }
}

impl FromIterator<PrecomputedRecord> for PrecomputedCatalogue {
    fn from_iter<T: IntoIterator<Item = PrecomputedRecord>>(iter: T) -> Self {
        let mut catalogue = PrecomputedCatalogue::new();
        for record in iter {
            catalogue.insert(record);
        }
        catalogue
    }
}

/// Pending visit: node id plus the ancestor prefix shared with its siblings.
struct Frame {
    id: ProductId,
    ancestors: Rc<[String]>,
}

/// Compute the ancestor chain of every node with a single pre-order walk.
///
/// Returns the records in visit order. Siblings share one immutable prefix; a node's
/// own name is appended into a fresh prefix only when it has children to hand it to.
pub fn precompute(tree: &Tree) -> Vec<PrecomputedRecord> {
    let mut visited = Vec::with_capacity(tree.len());
    let empty: Rc<[String]> = Rc::from(Vec::new());

    let mut stack: Vec<Frame> = tree
        .root_nodes()
        .iter()
        .rev()
        .map(|root| Frame {
            id: root.id(),
            ancestors: Rc::clone(&empty),
        })
        .collect();

    while let Some(frame) = stack.pop() {
        let Some(node) = tree.get(frame.id) else {
            continue;
        };

        let name = match node.name() {
            Some(name) => name.to_string(),
            None => {
                warn!(id = node.id(), "Precomputing placeholder product without a name");
                String::new()
            }
        };

        if !node.children().is_empty() {
            let mut extended = Vec::with_capacity(frame.ancestors.len() + 1);
            extended.extend(frame.ancestors.iter().cloned());
            extended.push(name.clone());
            let extended: Rc<[String]> = Rc::from(extended);
            for child in node.children().iter().rev() {
                stack.push(Frame {
                    id: *child,
                    ancestors: Rc::clone(&extended),
                });
            }
        }

        visited.push(PrecomputedRecord {
            id: node.id(),
            name,
            parent_id: node.parent(),
            ancestors: frame.ancestors.to_vec(),
        });
    }

    debug!(records = visited.len(), "Precomputed ancestor chains");
    visited
}

/// Precompute and collect into the id-keyed catalogue persisted as the artifact.
pub fn precompute_catalogue(tree: &Tree) -> PrecomputedCatalogue {
    precompute(tree).into_iter().collect()
}
