use std::sync::Arc;

use catalogue_transfer::datastore::{FaultPolicy, InMemoryDatastore};
use catalogue_transfer::store::{Checkpoint, CheckpointStore};
use catalogue_transfer::transfer::PreparationOutcome;

use super::support::{layered_source, StateDir};

#[test]
fn resume_starts_at_checkpointed_window() {
    let state = StateDir::with_source(&layered_source(20));
    let pipeline = state.pipeline(Arc::new(InMemoryDatastore::new()), 5);
    pipeline.prepare().unwrap();

    // Leading id of window 2 (ids 11..=15)
    state.checkpoint_store().save(Checkpoint::new(11)).unwrap();

    let api = Arc::new(InMemoryDatastore::new());
    let report = state.pipeline(api.clone(), 5).submit().unwrap();

    assert_eq!(report.skipped_windows, 2);
    assert_eq!(report.submitted_windows, 2);
    assert_eq!(
        api.bulk_calls(),
        vec![vec![11, 12, 13, 14, 15], vec![16, 17, 18, 19, 20]]
    );
}

#[test]
fn fault_mid_run_keeps_last_confirmed_checkpoint() {
    let state = StateDir::with_source(&layered_source(18));
    let api = Arc::new(InMemoryDatastore::with_faults(FaultPolicy::on_attempts([1])));

    let err = state.pipeline(api.clone(), 5).run().unwrap_err();
    assert!(err.is_transient());
    assert_eq!(api.bulk_calls(), vec![vec![1, 2, 3, 4, 5]]);
    assert_eq!(
        state.checkpoint_store().load().unwrap(),
        Some(Checkpoint::new(1))
    );

    let retry = Arc::new(InMemoryDatastore::new());
    let report = state.pipeline(retry.clone(), 5).run().unwrap();
    assert_eq!(report.preparation, PreparationOutcome::Reused);
    // Checkpointed window is sent again.
    assert_eq!(retry.bulk_calls()[0], vec![1, 2, 3, 4, 5]);
    assert_eq!(retry.bulk_calls().len(), 4);
    assert_eq!(report.submission.checkpoint, Some(16));
}

#[test]
fn completed_transfer_resends_only_final_window() {
    let state = StateDir::with_source(&layered_source(12));
    state
        .pipeline(Arc::new(InMemoryDatastore::new()), 5)
        .run()
        .unwrap();

    let api = Arc::new(InMemoryDatastore::new());
    let report = state.pipeline(api.clone(), 5).run().unwrap();
    assert_eq!(report.submission.skipped_windows, 2);
    assert_eq!(api.bulk_calls(), vec![vec![11, 12]]);
}

#[test]
fn random_faults_converge_with_monotonic_checkpoint() {
    let state = StateDir::with_source(&layered_source(20));
    let mut previous: Option<Checkpoint> = None;
    let mut delivered = std::collections::BTreeSet::new();
    let mut completed = false;

    for run in 0..50u64 {
        let api = Arc::new(InMemoryDatastore::with_faults(FaultPolicy::random(
            0.3,
            Some(run),
        )));
        let outcome = state.pipeline(api.clone(), 5).run();
        delivered.extend(api.bulk_calls().into_iter().flatten());

        let current = state.checkpoint_store().load().unwrap();
        assert!(current >= previous, "checkpoint moved backwards on run {run}");
        previous = current;

        match outcome {
            Ok(report) => {
                assert_eq!(report.submission.checkpoint, Some(16));
                completed = true;
                break;
            }
            Err(e) => assert!(e.is_transient(), "unexpected error: {e}"),
        }
    }

    assert!(completed, "transfer did not finish within 50 runs");
    assert_eq!(delivered, (1..=20).collect());
}

#[test]
fn sled_checkpoint_survives_reopen_between_runs() {
    use catalogue_transfer::store::{JsonArtifactStore, SledCheckpointStore};
    use catalogue_transfer::transfer::TransferPipeline;

    let state = StateDir::with_source(&layered_source(14));
    let db_path = state.root().join("state").join("checkpoint.db");
    let pipeline_with = |api: Arc<InMemoryDatastore>| {
        let checkpoints = SledCheckpointStore::open(&db_path).unwrap();
        TransferPipeline::new(
            state.source(),
            Arc::new(JsonArtifactStore::new(state.artifact())),
            Arc::new(checkpoints),
            api,
        )
        .with_window_size(5)
    };

    {
        let flaky = Arc::new(InMemoryDatastore::with_faults(FaultPolicy::on_attempts([2])));
        assert!(pipeline_with(flaky).run().is_err());
    }

    let reopened = SledCheckpointStore::open(&db_path).unwrap();
    assert_eq!(reopened.load().unwrap(), Some(Checkpoint::new(6)));
    drop(reopened);

    let api = Arc::new(InMemoryDatastore::new());
    let report = pipeline_with(api.clone()).run().unwrap();
    assert_eq!(report.submission.skipped_windows, 1);
    assert_eq!(api.bulk_calls(), vec![vec![6, 7, 8, 9, 10], vec![11, 12, 13, 14]]);
}
