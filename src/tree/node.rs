//! Product node held by the tree registry

use crate::types::ProductId;

/// Product node
///
/// A node is created either from its own record or as a placeholder when another
/// record names it as parent first. Links are ids into the owning [`super::Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) id: ProductId,
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<ProductId>,
    pub(crate) children: Vec<ProductId>, // in link order
}

impl Node {
    pub(crate) fn placeholder(id: ProductId) -> Self {
        Self {
            id,
            name: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Name from the node's own record; `None` while it is still a placeholder.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<ProductId> {
        self.parent
    }

    pub fn children(&self) -> &[ProductId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_placeholder(&self) -> bool {
        self.name.is_none()
    }
}
