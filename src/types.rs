//! Core types shared across the transfer pipeline.

use serde::{Deserialize, Serialize};

/// ProductId: caller-assigned identifier of a source product.
///
/// Ids grow with depth: a child's id is always greater than the ids of its ancestors.
pub type ProductId = i64;

/// Flat product record as it appears in the source file.
///
/// Unknown fields (e.g. `children_ids` from older exports) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<ProductId>,
}

impl ProductRecord {
    pub fn new(id: ProductId, name: impl Into<String>, parent_id: Option<ProductId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
        }
    }
}
