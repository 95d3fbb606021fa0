//! Checkpoint stores: plain text file and embedded sled database.

use super::{write_replacing, Checkpoint, CheckpointStore};
use crate::error::StorageError;
use crate::types::ProductId;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Checkpoint kept as the decimal id in a single plain-text file.
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self) -> Result<Option<Checkpoint>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(e)),
        };

        let first_id: ProductId = contents.trim().parse().map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: format!("Checkpoint is not a decimal id ({:?}): {}", contents.trim(), e),
        })?;
        Ok(Some(Checkpoint::new(first_id)))
    }

    fn save(&self, checkpoint: Checkpoint) -> Result<(), StorageError> {
        write_replacing(&self.path, checkpoint.to_string().as_bytes())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }
}

const CHECKPOINT_KEY: &[u8] = b"checkpoint";

/// Checkpoint kept in an embedded sled database.
pub struct SledCheckpointStore {
    db: sled::Db,
    path: PathBuf,
}

impl SledCheckpointStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        let db = sled::open(&path)?;
        Ok(Self { db, path })
    }

    pub fn from_db(db: sled::Db, path: impl Into<PathBuf>) -> Self {
        Self {
            db,
            path: path.into(),
        }
    }
}

impl CheckpointStore for SledCheckpointStore {
    fn load(&self) -> Result<Option<Checkpoint>, StorageError> {
        let Some(value) = self.db.get(CHECKPOINT_KEY)? else {
            return Ok(None);
        };
        let bytes = <[u8; 8]>::try_from(&value[..]).map_err(|_| StorageError::Corrupt {
            path: self.path.clone(),
            reason: format!("Checkpoint value has {} bytes, expected 8", value.len()),
        })?;
        Ok(Some(Checkpoint::new(ProductId::from_be_bytes(bytes))))
    }

    fn save(&self, checkpoint: Checkpoint) -> Result<(), StorageError> {
        self.db
            .insert(CHECKPOINT_KEY, checkpoint.first_id().to_be_bytes().to_vec())?;
        self.db.flush()?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.db.remove(CHECKPOINT_KEY)?;
        self.db.flush()?;
        Ok(())
    }
}
