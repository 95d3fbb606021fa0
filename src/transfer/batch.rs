//! Window partitioning and bulk submission

use crate::ancestry::PrecomputedRecord;
use crate::datastore::{CatalogueApi, StoredProduct};
use crate::error::TransferError;
use crate::types::ProductId;
use std::collections::HashSet;
use tracing::debug;

/// Contiguous run of records submitted in one bulk-create call.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub index: usize,
    pub first_id: ProductId,
    pub records: &'a [PrecomputedRecord],
}

impl<'a> Window<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Number of windows `len` records split into; the last one may be partial.
pub fn window_count(len: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    len.div_ceil(size)
}

/// Cut id-ordered records into windows of `size`, keeping any trailing remainder.
pub fn partition(
    records: &[PrecomputedRecord],
    size: usize,
) -> Result<Vec<Window<'_>>, TransferError> {
    if size == 0 {
        return Err(TransferError::ConfigError(
            "Batch size must be at least 1".to_string(),
        ));
    }
    Ok(records
        .chunks(size)
        .enumerate()
        .map(|(index, chunk)| Window {
            index,
            first_id: chunk[0].id,
            records: chunk,
        })
        .collect())
}

/// Sends whole windows to the datastore and checks what comes back.
pub struct BatchSubmitter<'a> {
    api: &'a dyn CatalogueApi,
}

impl<'a> BatchSubmitter<'a> {
    pub fn new(api: &'a dyn CatalogueApi) -> Self {
        Self { api }
    }

    /// Submit one window as a single bulk-create call.
    ///
    /// Faults from the datastore propagate unchanged; nothing is retried here.
    pub fn submit(&self, window: &Window<'_>) -> Result<Vec<StoredProduct>, TransferError> {
        let stored = self.api.bulk_create(window.records)?;
        verify_assignment(window, &stored)?;
        debug!(
            window = window.index,
            first_id = window.first_id,
            records = stored.len(),
            "Submitted window"
        );
        Ok(stored)
    }
}

/// The datastore must hand back one stored product per record, each with its own id.
fn verify_assignment(window: &Window<'_>, stored: &[StoredProduct]) -> Result<(), TransferError> {
    if stored.len() != window.len() {
        return Err(TransferError::IntegrityViolation(format!(
            "window {} sent {} records but {} were stored",
            window.index,
            window.len(),
            stored.len()
        )));
    }
    if let Some(product) = stored.iter().find(|product| product.id.is_nil()) {
        return Err(TransferError::IntegrityViolation(format!(
            "product {} was stored without an identifier",
            product.source_id
        )));
    }
    let unique: HashSet<_> = stored.iter().map(|product| product.id).collect();
    if unique.len() != stored.len() {
        return Err(TransferError::IntegrityViolation(format!(
            "window {} received duplicate identifiers",
            window.index
        )));
    }
    Ok(())
}
