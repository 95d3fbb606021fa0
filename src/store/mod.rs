//! Durable Transfer State
//!
//! Small persistence interfaces for the two pieces of state that survive a restart:
//! the precomputed artifact (phase 1 output) and the submission checkpoint. Pipeline
//! code depends only on the traits, so the storage medium can change freely.

pub mod artifact;
pub mod checkpoint;

pub use artifact::JsonArtifactStore;
pub use checkpoint::{FileCheckpointStore, SledCheckpointStore};

use crate::ancestry::PrecomputedCatalogue;
use crate::error::StorageError;
use crate::types::ProductId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Checkpoint: leading product id of the most recently confirmed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checkpoint(ProductId);

impl Checkpoint {
    pub fn new(first_id: ProductId) -> Self {
        Checkpoint(first_id)
    }

    pub fn first_id(&self) -> ProductId {
        self.0
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Checkpoint store interface
///
/// `load` returning `None` means no window has been confirmed yet.
pub trait CheckpointStore: Send + Sync {
    fn load(&self) -> Result<Option<Checkpoint>, StorageError>;
    fn save(&self, checkpoint: Checkpoint) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Precomputed artifact store interface
///
/// Presence of the artifact is the only signal that phase 1 has already run.
pub trait ArtifactStore: Send + Sync {
    fn exists(&self) -> bool;
    fn load(&self) -> Result<PrecomputedCatalogue, StorageError>;
    fn save(&self, catalogue: &PrecomputedCatalogue) -> Result<(), StorageError>;
    fn remove(&self) -> Result<(), StorageError>;
    /// Human-readable location for logs and errors.
    fn location(&self) -> String;
}

/// Write `contents` next to `path` and rename it into place.
///
/// A crash mid-write leaves a stray `.tmp` sibling, never a half-written target.
pub(crate) fn write_replacing(path: &std::path::Path, contents: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
