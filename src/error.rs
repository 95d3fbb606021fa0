//! Error types for the transfer pipeline.

use crate::types::ProductId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the durable state layer (artifact and checkpoint).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt state in {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Embedded store error: {0}")]
    Backend(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Top-level error for every pipeline operation.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Source file could not be read or is not a valid product list.
    #[error("Invalid source {path}: {reason}")]
    InvalidSource { path: PathBuf, reason: String },

    /// A record's parent does not precede it in id order.
    #[error("Product {id} references parent {parent_id}, but parent ids must be smaller than child ids")]
    OrderingViolation { id: ProductId, parent_id: ProductId },

    #[error("Linking product {id} under parent {parent_id} would create a cycle")]
    CycleDetected { id: ProductId, parent_id: ProductId },

    /// Induced datastore failure standing in for real downstream flakiness.
    #[error("Simulated datastore fault during {operation}")]
    SimulatedFault { operation: &'static str },

    #[error("Datastore integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Precomputed artifact not found at {0}; run the precompute phase first")]
    MissingArtifact(String),

    #[error("Another transfer holds the run lock at {0}")]
    RunLocked(PathBuf),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Interaction failed: {0}")]
    Interaction(String),
}

impl TransferError {
    /// True for failures that a plain re-run is expected to get past.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransferError::SimulatedFault { .. })
    }
}

impl From<config::ConfigError> for TransferError {
    fn from(err: config::ConfigError) -> Self {
        TransferError::ConfigError(err.to_string())
    }
}
