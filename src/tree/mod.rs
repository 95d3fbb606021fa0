//! Product Tree
//!
//! Rebuilds the catalogue forest from flat records that may arrive in any order.
//! The tree is an id-keyed registry: a lookup for an unseen parent creates a
//! placeholder entry, which is completed when that parent's own record is pushed.
//! Nodes link to each other by id, so the registry is the sole owner of every node.

pub mod node;
pub mod source;

pub use node::Node;
pub use source::{build_tree, read_source, validate_ordering};

use crate::error::TransferError;
use crate::types::{ProductId, ProductRecord};
use std::collections::HashMap;

/// Forest of product nodes keyed by id, kept in first-reference order.
#[derive(Debug, Default, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    index: HashMap<ProductId, usize>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree by pushing every record in sequence.
    pub fn from_records<'a, I>(records: I) -> Result<Self, TransferError>
    where
        I: IntoIterator<Item = &'a ProductRecord>,
    {
        let mut tree = Tree::new();
        for record in records {
            tree.push(record)?;
        }
        Ok(tree)
    }

    /// Insert or update the node for `record.id` and link it under its parent.
    ///
    /// Pushing an id again overwrites its name. If the parent is unchanged the edge is
    /// left alone; if it changed, the node moves and the old edge is dropped.
    pub fn push(&mut self, record: &ProductRecord) -> Result<(), TransferError> {
        if let Some(parent_id) = record.parent_id {
            if parent_id == record.id || self.is_descendant(parent_id, record.id) {
                return Err(TransferError::CycleDetected {
                    id: record.id,
                    parent_id,
                });
            }
        }

        let slot = self.slot_or_placeholder(record.id);
        self.nodes[slot].name = Some(record.name.clone());

        let previous = self.nodes[slot].parent;
        if previous == record.parent_id {
            return Ok(());
        }

        if let Some(old_parent) = previous {
            if let Some(&old_slot) = self.index.get(&old_parent) {
                self.nodes[old_slot].children.retain(|child| *child != record.id);
            }
        }

        self.nodes[slot].parent = record.parent_id;
        if let Some(parent_id) = record.parent_id {
            let parent_slot = self.slot_or_placeholder(parent_id);
            self.nodes[parent_slot].children.push(record.id);
        }
        Ok(())
    }

    pub fn get(&self, id: ProductId) -> Option<&Node> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in first-reference order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// All nodes without a parent link, in first-reference order.
    pub fn root_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|node| node.is_root()).collect()
    }

    /// Children of `id` in link order. Empty for unknown ids.
    pub fn children(&self, id: ProductId) -> Vec<&Node> {
        self.get(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child| self.get(*child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ids referenced as a parent whose own record never arrived.
    pub fn placeholders(&self) -> Vec<ProductId> {
        self.nodes
            .iter()
            .filter(|node| node.is_placeholder())
            .map(|node| node.id)
            .collect()
    }

    /// Whether `candidate` sits in the subtree rooted at `ancestor` (inclusive).
    pub fn is_descendant(&self, candidate: ProductId, ancestor: ProductId) -> bool {
        let mut cursor = Some(candidate);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.get(id).and_then(|node| node.parent);
        }
        false
    }

    fn slot_or_placeholder(&mut self, id: ProductId) -> usize {
        if let Some(&slot) = self.index.get(&id) {
            return slot;
        }
        let slot = self.nodes.len();
        self.nodes.push(Node::placeholder(id));
        self.index.insert(id, slot);
        slot
    }
}
