use std::collections::HashSet;
use std::sync::Arc;

use catalogue_transfer::datastore::{CatalogueApi, InMemoryDatastore};
use catalogue_transfer::error::TransferError;
use catalogue_transfer::store::{ArtifactStore, Checkpoint, CheckpointStore, JsonArtifactStore};
use catalogue_transfer::transfer::PreparationOutcome;

use super::support::{layered_source, StateDir, ELECTRONICS_SOURCE};

#[test]
fn electronics_catalogue_is_sent_in_one_call() {
    let state = StateDir::with_source(ELECTRONICS_SOURCE);
    let api = Arc::new(InMemoryDatastore::new());

    let report = state.pipeline(api.clone(), 5).run().unwrap();

    assert_eq!(report.submission.total_windows, 1);
    assert_eq!(api.bulk_calls(), vec![vec![1, 2, 3]]);
    let cases = api.find_by_source(3);
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].ancestors, vec!["Electronics", "Phones"]);
    assert!(api.find_by_source(1)[0].ancestors.is_empty());
}

#[test]
fn artifact_is_keyed_by_string_ids() {
    let state = StateDir::with_source(ELECTRONICS_SOURCE);
    state
        .pipeline(Arc::new(InMemoryDatastore::new()), 5)
        .prepare()
        .unwrap();

    let contents = std::fs::read_to_string(state.artifact()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["3"]["name"], "Cases");
    assert_eq!(parsed["3"]["parent_id"], 2);
    assert_eq!(
        parsed["3"]["ancestors"],
        serde_json::json!(["Electronics", "Phones"])
    );
    assert!(parsed["1"]["parent_id"].is_null());
}

#[test]
fn second_prepare_is_a_no_op() {
    let state = StateDir::with_source(&layered_source(30));
    let pipeline = state.pipeline(Arc::new(InMemoryDatastore::new()), 5);

    assert_eq!(
        pipeline.prepare().unwrap(),
        PreparationOutcome::Written { records: 30 }
    );
    let written = std::fs::read(state.artifact()).unwrap();

    std::fs::remove_file(state.source()).unwrap();
    assert_eq!(pipeline.prepare().unwrap(), PreparationOutcome::Reused);
    assert_eq!(std::fs::read(state.artifact()).unwrap(), written);
}

#[test]
fn window_count_is_ceiling_of_records_over_size() {
    let state = StateDir::with_source(&layered_source(23));
    let api = Arc::new(InMemoryDatastore::new());

    let report = state.pipeline(api.clone(), 5).run().unwrap();

    let calls = api.bulk_calls();
    assert_eq!(calls.len(), 5);
    assert_eq!(report.submission.submitted_windows, 5);
    assert_eq!(calls.last().unwrap().len(), 3);
    assert!(calls[..4].iter().all(|call| call.len() == 5));
    let flattened: Vec<i64> = calls.into_iter().flatten().collect();
    assert_eq!(flattened, (1..=23).collect::<Vec<i64>>());
}

#[test]
fn every_stored_product_gets_a_unique_identifier() {
    let state = StateDir::with_source(&layered_source(40));
    state
        .pipeline(Arc::new(InMemoryDatastore::new()), 7)
        .prepare()
        .unwrap();
    let records = JsonArtifactStore::new(state.artifact())
        .load()
        .unwrap()
        .to_ordered_vec();

    let api = InMemoryDatastore::new();
    let result = api.bulk_create(&records).unwrap();
    let ids: HashSet<_> = result.iter().map(|product| product.id).collect();
    assert_eq!(ids.len(), result.len());
    assert!(result.iter().all(|product| !product.id.is_nil()));
}

#[test]
fn ordering_violation_is_rejected_before_any_state_is_written() {
    let state = StateDir::with_source(
        r#"[{"id": 4, "name": "Phones", "parent_id": 9},
            {"id": 9, "name": "Electronics", "parent_id": null}]"#,
    );
    let api = Arc::new(InMemoryDatastore::new());

    let err = state.pipeline(api.clone(), 5).run().unwrap_err();
    assert!(matches!(
        err,
        TransferError::OrderingViolation { id: 4, parent_id: 9 }
    ));
    assert!(!state.artifact().exists());
    assert_eq!(state.checkpoint_store().load().unwrap(), None::<Checkpoint>);
    assert_eq!(api.attempts(), 0);
}
