use std::path::{Path, PathBuf};
use std::sync::Arc;

use catalogue_transfer::datastore::InMemoryDatastore;
use catalogue_transfer::store::{FileCheckpointStore, JsonArtifactStore};
use catalogue_transfer::transfer::TransferPipeline;
use catalogue_transfer::types::ProductId;
use tempfile::TempDir;

pub const ELECTRONICS_SOURCE: &str = r#"[
    {"id": 1, "name": "Electronics", "parent_id": null},
    {"id": 2, "name": "Phones", "parent_id": 1},
    {"id": 3, "name": "Cases", "parent_id": 2}
]"#;

/// Source with `count` products: id 1 is the root, every later id hangs off the
/// previous multiple of four, giving a few levels of nesting.
pub fn layered_source(count: ProductId) -> String {
    let records: Vec<serde_json::Value> = (1..=count)
        .map(|id| {
            let parent = if id == 1 { None } else { Some(((id - 1) / 4).max(1)) };
            serde_json::json!({
                "id": id,
                "name": format!("category-{}", id),
                "parent_id": parent,
            })
        })
        .collect();
    serde_json::to_string_pretty(&records).unwrap()
}

pub struct StateDir {
    pub temp_dir: TempDir,
}

impl StateDir {
    pub fn with_source(contents: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("products.json"), contents).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("products.json")
    }

    pub fn artifact(&self) -> PathBuf {
        self.root().join("state").join("precomputed.json")
    }

    pub fn checkpoint(&self) -> PathBuf {
        self.root().join("state").join("checkpoint")
    }

    pub fn checkpoint_store(&self) -> FileCheckpointStore {
        FileCheckpointStore::new(self.checkpoint())
    }

    pub fn pipeline(&self, api: Arc<InMemoryDatastore>, window_size: usize) -> TransferPipeline {
        TransferPipeline::new(
            self.source(),
            Arc::new(JsonArtifactStore::new(self.artifact())),
            Arc::new(self.checkpoint_store()),
            api,
        )
        .with_window_size(window_size)
    }
}
