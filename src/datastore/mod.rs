//! Datastore Client
//!
//! The datastore is an external collaborator reached through a create/bulk-create
//! API. Every call may fail with a transient fault, and every stored product is
//! given a fresh opaque identifier by the datastore, never by the caller.

pub mod fault;
pub mod memory;

pub use fault::FaultPolicy;
pub use memory::InMemoryDatastore;

use crate::ancestry::PrecomputedRecord;
use crate::error::TransferError;
use crate::types::ProductId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product as persisted by the datastore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProduct {
    /// Datastore-assigned identifier.
    pub id: Uuid,
    /// Id the product carried in the source catalogue.
    pub source_id: ProductId,
    pub name: String,
    pub parent_id: Option<ProductId>,
    pub ancestors: Vec<String>,
}

impl StoredProduct {
    pub fn assign(record: &PrecomputedRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id: record.id,
            name: record.name.clone(),
            parent_id: record.parent_id,
            ancestors: record.ancestors.clone(),
        }
    }
}

/// Catalogue datastore API
///
/// Implementations must assign a unique id to every record before storing it.
pub trait CatalogueApi: Send + Sync {
    fn create(&self, record: &PrecomputedRecord) -> Result<StoredProduct, TransferError>;
    fn bulk_create(
        &self,
        records: &[PrecomputedRecord],
    ) -> Result<Vec<StoredProduct>, TransferError>;
}
