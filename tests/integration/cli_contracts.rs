use std::path::PathBuf;

use catalogue_transfer::concurrency::RunLock;
use catalogue_transfer::config::{CheckpointBackend, TransferConfig};
use catalogue_transfer::error::TransferError;
use catalogue_transfer::tooling::{CliContext, Commands};

use super::support::{layered_source, StateDir, ELECTRONICS_SOURCE};

fn context(state: &StateDir, configure: impl FnOnce(&mut TransferConfig)) -> CliContext {
    let mut config = TransferConfig::default();
    config.source = Some(PathBuf::from("products.json"));
    config.state.dir = state.root().join("state");
    configure(&mut config);
    CliContext::from_config(state.root().to_path_buf(), config).unwrap()
}

#[test]
fn run_reports_precomputation_and_submission() {
    let state = StateDir::with_source(ELECTRONICS_SOURCE);
    let ctx = context(&state, |_| {});

    let output = ctx.execute(&Commands::Run { source: None }).unwrap();
    assert_eq!(
        output,
        "Precomputed 3 records\nSubmitted 1 of 1 windows (3 records, 0 skipped); checkpoint: 1"
    );
    assert_eq!(ctx.datastore().len(), 3);
    assert!(state.artifact().exists());

    let again = ctx.execute(&Commands::Run { source: None }).unwrap();
    assert!(again.starts_with("Reused precomputed artifact"));
}

#[test]
fn status_json_reflects_checkpoint_progress() {
    let state = StateDir::with_source(&layered_source(12));
    let ctx = context(&state, |config| config.batch.size = 4);

    ctx.execute(&Commands::Run { source: None }).unwrap();
    let output = ctx
        .execute(&Commands::Status {
            format: "json".to_string(),
        })
        .unwrap();
    let status: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(status["artifact_present"], true);
    assert_eq!(status["records"], 12);
    assert_eq!(status["window_size"], 4);
    assert_eq!(status["resume"]["total_windows"], 3);
    assert_eq!(status["resume"]["confirmed_windows"], 3);
    assert_eq!(status["resume"]["checkpoint"], 9);
}

#[test]
fn status_rejects_unknown_format() {
    let state = StateDir::with_source(ELECTRONICS_SOURCE);
    let ctx = context(&state, |_| {});
    let err = ctx
        .execute(&Commands::Status {
            format: "yaml".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, TransferError::ConfigError(_)));
}

#[test]
fn forced_precompute_rebuilds_from_changed_source() {
    let state = StateDir::with_source(ELECTRONICS_SOURCE);
    let ctx = context(&state, |_| {});
    ctx.execute(&Commands::Precompute {
        source: None,
        force: false,
    })
    .unwrap();

    std::fs::write(state.source(), layered_source(7)).unwrap();
    let unchanged = ctx
        .execute(&Commands::Precompute {
            source: None,
            force: false,
        })
        .unwrap();
    assert!(unchanged.contains("source not read"));

    let rebuilt = ctx
        .execute(&Commands::Precompute {
            source: None,
            force: true,
        })
        .unwrap();
    assert!(rebuilt.starts_with("Precomputed 7 records"));
}

#[test]
fn reset_with_artifact_clears_all_state() {
    let state = StateDir::with_source(ELECTRONICS_SOURCE);
    let ctx = context(&state, |_| {});
    ctx.execute(&Commands::Run { source: None }).unwrap();
    assert!(state.checkpoint().exists());

    let output = ctx
        .execute(&Commands::Reset {
            artifact: true,
            yes: true,
        })
        .unwrap();
    assert_eq!(output, "Cleared checkpoint and precomputed artifact");
    assert!(!state.checkpoint().exists());
    assert!(!state.artifact().exists());
}

#[test]
fn submit_without_artifact_is_an_error() {
    let state = StateDir::with_source(ELECTRONICS_SOURCE);
    let ctx = context(&state, |_| {});
    let err = ctx.execute(&Commands::Submit).unwrap_err();
    assert!(matches!(err, TransferError::MissingArtifact(_)));
}

#[test]
fn held_run_lock_rejects_mutating_commands() {
    let state = StateDir::with_source(ELECTRONICS_SOURCE);
    let ctx = context(&state, |_| {});
    let _held = RunLock::acquire(&ctx.paths().lock).unwrap();

    let err = ctx.execute(&Commands::Run { source: None }).unwrap_err();
    assert!(matches!(err, TransferError::RunLocked(_)));
    assert_eq!(ctx.datastore().attempts(), 0);

    // Read-only status does not take the lock.
    ctx.execute(&Commands::Status {
        format: "text".to_string(),
    })
    .unwrap();
}

#[test]
fn sled_backend_is_selected_from_config() {
    let state = StateDir::with_source(ELECTRONICS_SOURCE);
    let ctx = context(&state, |config| {
        config.state.checkpoint_backend = CheckpointBackend::Sled;
    });
    assert!(ctx.paths().checkpoint.ends_with("checkpoint.db"));

    ctx.execute(&Commands::Run { source: None }).unwrap();
    assert!(ctx.paths().checkpoint.is_dir());
    assert!(!state.checkpoint().exists());
}
