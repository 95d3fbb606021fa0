//! Run exclusion for transfer state
//!
//! The artifact and checkpoint have no concurrent-writer protection of their own.
//! Callers that may race (the CLI) hold a [`RunLock`] on the state directory for the
//! duration of a run.

use crate::error::{StorageError, TransferError};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Advisory lock file created with `create_new`; removed on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Take the lock, failing with [`TransferError::RunLocked`] if it is held.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, TransferError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::IoError)?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(TransferError::RunLocked(path));
            }
            Err(e) => return Err(StorageError::IoError(e).into()),
        };
        writeln!(file, "{}", std::process::id()).map_err(StorageError::IoError)?;

        debug!(path = %path.display(), "Acquired run lock");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to release run lock");
        }
    }
}
