//! In-memory datastore
//!
//! Reference implementation of [`CatalogueApi`] used by the CLI and tests. Faults
//! are decided by a [`FaultPolicy`] before storage is touched, so a failed call
//! never stores a partial window.

use super::{CatalogueApi, FaultPolicy, StoredProduct};
use crate::ancestry::PrecomputedRecord;
use crate::error::TransferError;
use crate::types::ProductId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{trace, warn};
use uuid::Uuid;

pub struct InMemoryDatastore {
    storage: RwLock<HashMap<Uuid, StoredProduct>>,
    /// Source ids of every successful bulk-create call, in call order
    bulk_calls: RwLock<Vec<Vec<ProductId>>>,
    attempts: AtomicUsize,
    faults: FaultPolicy,
}

impl Default for InMemoryDatastore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDatastore {
    pub fn new() -> Self {
        Self::with_faults(FaultPolicy::Never)
    }

    pub fn with_faults(faults: FaultPolicy) -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
            bulk_calls: RwLock::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            faults,
        }
    }

    pub fn len(&self) -> usize {
        self.storage.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.read().is_empty()
    }

    pub fn get(&self, id: &Uuid) -> Option<StoredProduct> {
        self.storage.read().get(id).cloned()
    }

    /// Every stored copy of a source product; more than one after a window is resent.
    pub fn find_by_source(&self, source_id: ProductId) -> Vec<StoredProduct> {
        self.storage
            .read()
            .values()
            .filter(|product| product.source_id == source_id)
            .cloned()
            .collect()
    }

    pub fn bulk_calls(&self) -> Vec<Vec<ProductId>> {
        self.bulk_calls.read().clone()
    }

    /// Calls attempted so far, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn admit(&self, operation: &'static str) -> Result<(), TransferError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.faults.should_fail(attempt) {
            warn!(operation, attempt, "Datastore call failed with simulated fault");
            return Err(TransferError::SimulatedFault { operation });
        }
        Ok(())
    }
}

impl CatalogueApi for InMemoryDatastore {
    fn create(&self, record: &PrecomputedRecord) -> Result<StoredProduct, TransferError> {
        self.admit("create")?;
        let stored = StoredProduct::assign(record);
        self.storage.write().insert(stored.id, stored.clone());
        trace!(source_id = record.id, id = %stored.id, "Stored product");
        Ok(stored)
    }

    fn bulk_create(
        &self,
        records: &[PrecomputedRecord],
    ) -> Result<Vec<StoredProduct>, TransferError> {
        self.admit("bulk_create")?;
        let stored: Vec<StoredProduct> = records.iter().map(StoredProduct::assign).collect();
        {
            let mut storage = self.storage.write();
            for product in &stored {
                storage.insert(product.id, product.clone());
            }
        }
        self.bulk_calls
            .write()
            .push(records.iter().map(|record| record.id).collect());
        trace!(records = stored.len(), "Stored product batch");
        Ok(stored)
    }
}
