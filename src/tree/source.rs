//! Source file loading
//!
//! Reads the flat product list and checks the id-ordering precondition before any
//! node is created.

use super::Tree;
use crate::error::TransferError;
use crate::types::ProductRecord;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read and parse the source product list.
///
/// Unreadable files and malformed JSON both surface as
/// [`TransferError::InvalidSource`] naming the concrete cause.
pub fn read_source(path: &Path) -> Result<Vec<ProductRecord>, TransferError> {
    let bytes = std::fs::read(path).map_err(|e| TransferError::InvalidSource {
        path: path.to_path_buf(),
        reason: format!("Failed to read source file: {}", e),
    })?;

    let records: Vec<ProductRecord> =
        serde_json::from_slice(&bytes).map_err(|e| TransferError::InvalidSource {
            path: path.to_path_buf(),
            reason: format!("The source file is not a valid product list: {}", e),
        })?;

    debug!(path = %path.display(), records = records.len(), "Parsed source file");
    Ok(records)
}

/// Every parent id must be strictly smaller than its child's id.
///
/// Batch ordering and resume-skip decisions both rely on ids growing with depth.
pub fn validate_ordering(records: &[ProductRecord]) -> Result<(), TransferError> {
    for record in records {
        if let Some(parent_id) = record.parent_id {
            if parent_id >= record.id {
                return Err(TransferError::OrderingViolation {
                    id: record.id,
                    parent_id,
                });
            }
        }
    }
    Ok(())
}

/// Load the source file and rebuild the product forest from it.
pub fn build_tree(path: &Path) -> Result<Tree, TransferError> {
    let records = read_source(path)?;
    validate_ordering(&records)?;

    let tree = Tree::from_records(&records)?;
    let placeholders = tree.placeholders();
    if !placeholders.is_empty() {
        warn!(
            count = placeholders.len(),
            ids = ?placeholders,
            "Source references parents that have no record of their own"
        );
    }
    info!(
        path = %path.display(),
        nodes = tree.len(),
        roots = tree.root_nodes().len(),
        "Built product tree"
    );
    Ok(tree)
}
