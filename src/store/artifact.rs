//! JSON file artifact store

use super::{write_replacing, ArtifactStore};
use crate::ancestry::PrecomputedCatalogue;
use crate::error::StorageError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores the precomputed catalogue as a pretty-printed JSON object keyed by id.
pub struct JsonArtifactStore {
    path: PathBuf,
}

impl JsonArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactStore for JsonArtifactStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<PrecomputedCatalogue, StorageError> {
        let bytes = std::fs::read(&self.path)?;
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: format!("Failed to parse precomputed artifact: {}", e),
        })
    }

    fn save(&self, catalogue: &PrecomputedCatalogue) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(catalogue)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        write_replacing(&self.path, &json)?;
        debug!(
            path = %self.path.display(),
            records = catalogue.len(),
            bytes = json.len(),
            "Wrote precomputed artifact"
        );
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
