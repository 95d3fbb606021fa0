//! Resume coordination
//!
//! Gates window submission on the durable checkpoint. Windows that start before the
//! checkpoint were confirmed by an earlier run and are skipped; the checkpointed
//! window itself is sent again, so delivery is at-least-once per window.

use super::batch::Window;
use crate::error::TransferError;
use crate::store::{Checkpoint, CheckpointStore};
use crate::types::ProductId;
use serde::Serialize;
use tracing::{debug, warn};

/// Progress summary derived from the checkpoint and the window layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeStatus {
    pub total_windows: usize,
    /// Windows at or before the checkpoint.
    pub confirmed_windows: usize,
    /// Index of the first window the next run submits, if any.
    pub resume_from: Option<usize>,
    pub checkpoint: Option<ProductId>,
}

pub struct ResumeCoordinator<'a> {
    store: &'a dyn CheckpointStore,
    checkpoint: Option<Checkpoint>,
}

impl<'a> ResumeCoordinator<'a> {
    /// Read the current checkpoint from `store`.
    pub fn load(store: &'a dyn CheckpointStore) -> Result<Self, TransferError> {
        let checkpoint = store.load()?;
        if let Some(checkpoint) = checkpoint {
            debug!(checkpoint = checkpoint.first_id(), "Loaded checkpoint");
        }
        Ok(Self { store, checkpoint })
    }

    pub fn checkpoint(&self) -> Option<Checkpoint> {
        self.checkpoint
    }

    /// True when `window` starts strictly before the checkpoint.
    pub fn should_skip(&self, window: &Window<'_>) -> bool {
        match self.checkpoint {
            Some(checkpoint) => window.first_id < checkpoint.first_id(),
            None => false,
        }
    }

    /// Record `window` as confirmed. Called only after its bulk-create returned.
    ///
    /// The checkpoint never moves backwards.
    pub fn commit(&mut self, window: &Window<'_>) -> Result<(), TransferError> {
        let next = Checkpoint::new(window.first_id);
        if let Some(current) = self.checkpoint {
            if next < current {
                warn!(
                    current = current.first_id(),
                    proposed = next.first_id(),
                    "Ignoring checkpoint that would move backwards"
                );
                return Ok(());
            }
        }
        self.store.save(next)?;
        self.checkpoint = Some(next);
        debug!(checkpoint = next.first_id(), window = window.index, "Checkpoint advanced");
        Ok(())
    }

    /// Forget all progress.
    pub fn reset(&mut self) -> Result<(), TransferError> {
        self.store.clear()?;
        self.checkpoint = None;
        Ok(())
    }

    pub fn status(&self, windows: &[Window<'_>]) -> ResumeStatus {
        let (confirmed_windows, resume_from) = match self.checkpoint {
            Some(checkpoint) => (
                windows
                    .iter()
                    .filter(|window| window.first_id <= checkpoint.first_id())
                    .count(),
                windows
                    .iter()
                    .position(|window| window.first_id >= checkpoint.first_id()),
            ),
            None => (0, if windows.is_empty() { None } else { Some(0) }),
        };
        ResumeStatus {
            total_windows: windows.len(),
            confirmed_windows,
            resume_from,
            checkpoint: self.checkpoint.map(|checkpoint| checkpoint.first_id()),
        }
    }
}
