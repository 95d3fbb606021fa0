//! Transfer Pipeline
//!
//! Two-phase migration of the product catalogue:
//!
//! 1. **Prepare**: build the forest from the source file, precompute ancestor chains
//!    and persist them as the artifact. Skipped entirely when the artifact exists.
//! 2. **Submit**: cut the artifact into id-ordered windows and bulk-create them one
//!    at a time, advancing the checkpoint after each confirmed window.
//!
//! A failed datastore call aborts the run with the checkpoint at its last confirmed
//! value. Re-running resumes from there because windows are re-derived from the
//! unchanged artifact.

pub mod batch;
pub mod resume;

pub use batch::{partition, window_count, BatchSubmitter, Window};
pub use resume::{ResumeCoordinator, ResumeStatus};

use crate::ancestry::precompute_catalogue;
use crate::datastore::CatalogueApi;
use crate::error::TransferError;
use crate::store::{ArtifactStore, CheckpointStore};
use crate::tree::build_tree;
use crate::types::ProductId;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Window size used when none is configured.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Result of the prepare phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PreparationOutcome {
    /// Artifact already present; source not read.
    Reused,
    Written { records: usize },
}

/// Result of the submit phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmitReport {
    pub total_windows: usize,
    pub skipped_windows: usize,
    pub submitted_windows: usize,
    pub submitted_records: usize,
    pub checkpoint: Option<ProductId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    pub preparation: PreparationOutcome,
    pub submission: SubmitReport,
}

/// Snapshot of durable pipeline state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStatus {
    pub artifact: String,
    pub artifact_present: bool,
    pub records: usize,
    pub window_size: usize,
    pub resume: ResumeStatus,
}

pub struct TransferPipeline {
    source: PathBuf,
    artifacts: Arc<dyn ArtifactStore>,
    checkpoints: Arc<dyn CheckpointStore>,
    api: Arc<dyn CatalogueApi>,
    window_size: usize,
}

impl TransferPipeline {
    pub fn new(
        source: impl Into<PathBuf>,
        artifacts: Arc<dyn ArtifactStore>,
        checkpoints: Arc<dyn CheckpointStore>,
        api: Arc<dyn CatalogueApi>,
    ) -> Self {
        Self {
            source: source.into(),
            artifacts,
            checkpoints,
            api,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Phase 1: build and precompute unless the artifact already exists.
    pub fn prepare(&self) -> Result<PreparationOutcome, TransferError> {
        if self.artifacts.exists() {
            info!(
                artifact = %self.artifacts.location(),
                "Precomputed artifact present, skipping tree build"
            );
            return Ok(PreparationOutcome::Reused);
        }

        let catalogue = {
            let tree = build_tree(&self.source)?;
            precompute_catalogue(&tree)
        };
        self.artifacts.save(&catalogue)?;
        info!(
            artifact = %self.artifacts.location(),
            records = catalogue.len(),
            "Wrote precomputed artifact"
        );
        Ok(PreparationOutcome::Written {
            records: catalogue.len(),
        })
    }

    /// Phase 1 after discarding any existing artifact.
    ///
    /// The checkpoint is left alone; windows are re-derived from the fresh artifact.
    pub fn prepare_fresh(&self) -> Result<PreparationOutcome, TransferError> {
        self.artifacts.remove()?;
        self.prepare()
    }

    /// Phase 2: submit every window not already confirmed by the checkpoint.
    pub fn submit(&self) -> Result<SubmitReport, TransferError> {
        if !self.artifacts.exists() {
            return Err(TransferError::MissingArtifact(self.artifacts.location()));
        }
        let records = self.artifacts.load()?.to_ordered_vec();
        let windows = partition(&records, self.window_size)?;

        let mut coordinator = ResumeCoordinator::load(self.checkpoints.as_ref())?;
        let submitter = BatchSubmitter::new(self.api.as_ref());
        let mut report = SubmitReport {
            total_windows: windows.len(),
            ..SubmitReport::default()
        };

        info!(
            records = records.len(),
            windows = windows.len(),
            window_size = self.window_size,
            checkpoint = ?coordinator.checkpoint().map(|c| c.first_id()),
            "Submitting precomputed catalogue"
        );

        for window in &windows {
            if coordinator.should_skip(window) {
                debug!(window = window.index, first_id = window.first_id, "Skipping confirmed window");
                report.skipped_windows += 1;
                continue;
            }

            submitter.submit(window).map_err(|e| {
                warn!(
                    window = window.index,
                    first_id = window.first_id,
                    error = %e,
                    "Window submission failed, aborting run"
                );
                e
            })?;
            coordinator.commit(window)?;

            report.submitted_windows += 1;
            report.submitted_records += window.len();
        }

        report.checkpoint = coordinator.checkpoint().map(|c| c.first_id());
        info!(
            submitted = report.submitted_windows,
            skipped = report.skipped_windows,
            records = report.submitted_records,
            "Submission complete"
        );
        Ok(report)
    }

    /// Run both phases in order.
    pub fn run(&self) -> Result<TransferReport, TransferError> {
        let preparation = self.prepare()?;
        let submission = self.submit()?;
        Ok(TransferReport {
            preparation,
            submission,
        })
    }

    pub fn status(&self) -> Result<PipelineStatus, TransferError> {
        let artifact_present = self.artifacts.exists();
        let records = if artifact_present {
            self.artifacts.load()?.to_ordered_vec()
        } else {
            Vec::new()
        };
        let windows = partition(&records, self.window_size)?;
        let coordinator = ResumeCoordinator::load(self.checkpoints.as_ref())?;

        Ok(PipelineStatus {
            artifact: self.artifacts.location(),
            artifact_present,
            records: records.len(),
            window_size: self.window_size,
            resume: coordinator.status(&windows),
        })
    }

    /// Clear the checkpoint, and the artifact too when `include_artifact` is set.
    pub fn reset(&self, include_artifact: bool) -> Result<(), TransferError> {
        let mut coordinator = ResumeCoordinator::load(self.checkpoints.as_ref())?;
        coordinator.reset()?;
        if include_artifact {
            self.artifacts.remove()?;
        }
        info!(include_artifact, "Transfer state reset");
        Ok(())
    }
}
