//! CLI Tooling
//!
//! Command-line interface for the transfer pipeline. Every command resolves the
//! same durable state (artifact and checkpoint) from configuration, so commands can
//! be mixed freely across process restarts.

use crate::concurrency::RunLock;
use crate::config::{CheckpointBackend, ConfigLoader, StatePaths, TransferConfig};
use crate::datastore::{FaultPolicy, InMemoryDatastore};
use crate::error::TransferError;
use crate::logging::LoggingConfig;
use crate::store::{
    ArtifactStore, CheckpointStore, FileCheckpointStore, JsonArtifactStore, SledCheckpointStore,
};
use crate::transfer::{
    PipelineStatus, PreparationOutcome, SubmitReport, TransferPipeline, TransferReport,
};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Catalogue Transfer - resumable product catalogue migration
#[derive(Parser, Debug)]
#[command(name = "catalogue-transfer")]
#[command(about = "Migrate a hierarchical product catalogue into a bulk-create datastore")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Working directory; relative source and state paths resolve against it
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Precompute (if needed) and submit all remaining windows
    Run {
        /// Source product list (overrides `source` from config)
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// Build the tree and write the precomputed artifact
    Precompute {
        /// Source product list (overrides `source` from config)
        #[arg(long)]
        source: Option<PathBuf>,
        /// Discard an existing artifact and rebuild it
        #[arg(long)]
        force: bool,
    },
    /// Submit windows from an existing artifact
    Submit,
    /// Show artifact and checkpoint state
    Status {
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Clear the checkpoint so the next run starts from the first window
    Reset {
        /// Also delete the precomputed artifact
        #[arg(long)]
        artifact: bool,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Apply `--log-*` flags on top of the configured logging settings.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

/// Resolved configuration and stores shared by every command.
pub struct CliContext {
    working_dir: PathBuf,
    config: TransferConfig,
    paths: StatePaths,
    artifacts: Arc<dyn ArtifactStore>,
    checkpoints: Arc<dyn CheckpointStore>,
    datastore: Arc<InMemoryDatastore>,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(working_dir: PathBuf, config_path: Option<PathBuf>) -> Result<Self, TransferError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&working_dir)?,
        };
        Self::from_config(working_dir, config)
    }

    /// Create a context from an already loaded configuration.
    pub fn from_config(working_dir: PathBuf, config: TransferConfig) -> Result<Self, TransferError> {
        config.validate()?;
        let paths = config.state.resolve_paths(&working_dir)?;

        let artifacts: Arc<dyn ArtifactStore> = Arc::new(JsonArtifactStore::new(&paths.artifact));
        let checkpoints: Arc<dyn CheckpointStore> = match paths.backend {
            CheckpointBackend::File => Arc::new(FileCheckpointStore::new(&paths.checkpoint)),
            CheckpointBackend::Sled => Arc::new(SledCheckpointStore::open(&paths.checkpoint)?),
        };

        let faults = if config.datastore.fault_probability > 0.0 {
            FaultPolicy::random(config.datastore.fault_probability, config.datastore.seed)
        } else {
            FaultPolicy::Never
        };

        Ok(Self {
            working_dir,
            config,
            paths,
            artifacts,
            checkpoints,
            datastore: Arc::new(InMemoryDatastore::with_faults(faults)),
        })
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    pub fn paths(&self) -> &StatePaths {
        &self.paths
    }

    /// Datastore receiving this context's submissions.
    pub fn datastore(&self) -> &Arc<InMemoryDatastore> {
        &self.datastore
    }

    pub fn execute(&self, command: &Commands) -> Result<String, TransferError> {
        match command {
            Commands::Run { source } => {
                let _lock = RunLock::acquire(&self.paths.lock)?;
                let pipeline = self.pipeline(source.as_deref(), !self.artifacts.exists())?;
                let report = pipeline.run()?;
                Ok(format_run_report(&report))
            }
            Commands::Precompute { source, force } => {
                let _lock = RunLock::acquire(&self.paths.lock)?;
                let pipeline = self.pipeline(source.as_deref(), true)?;
                let outcome = if *force {
                    pipeline.prepare_fresh()?
                } else {
                    pipeline.prepare()?
                };
                Ok(format_preparation(&outcome, &self.paths.artifact))
            }
            Commands::Submit => {
                let _lock = RunLock::acquire(&self.paths.lock)?;
                let report = self.pipeline(None, false)?.submit()?;
                Ok(format_submit_report(&report))
            }
            Commands::Status { format } => {
                let status = self.pipeline(None, false)?.status()?;
                match format.as_str() {
                    "json" => serde_json::to_string_pretty(&status)
                        .map_err(|e| TransferError::ConfigError(e.to_string())),
                    "text" => Ok(format_status_text(&status, &self.paths)),
                    other => Err(TransferError::ConfigError(format!(
                        "Invalid status format: {} (must be 'text' or 'json')",
                        other
                    ))),
                }
            }
            Commands::Reset { artifact, yes } => {
                if !*yes && !confirm_reset(*artifact)? {
                    return Ok("Reset cancelled".to_string());
                }
                let _lock = RunLock::acquire(&self.paths.lock)?;
                self.pipeline(None, false)?.reset(*artifact)?;
                info!(artifact = *artifact, "Reset transfer state");
                Ok(if *artifact {
                    "Cleared checkpoint and precomputed artifact".to_string()
                } else {
                    "Cleared checkpoint".to_string()
                })
            }
        }
    }

    /// Pipeline over this context's stores. Only phase 1 needs a source path.
    fn pipeline(
        &self,
        source_override: Option<&Path>,
        needs_source: bool,
    ) -> Result<TransferPipeline, TransferError> {
        let source = match self.config.resolve_source(&self.working_dir, source_override) {
            Ok(source) => source,
            Err(e) if needs_source => return Err(e),
            Err(_) => PathBuf::new(),
        };
        Ok(TransferPipeline::new(
            source,
            Arc::clone(&self.artifacts),
            Arc::clone(&self.checkpoints),
            self.datastore.clone(),
        )
        .with_window_size(self.config.batch.size))
    }
}

fn confirm_reset(include_artifact: bool) -> Result<bool, TransferError> {
    let prompt = if include_artifact {
        "Clear the checkpoint and delete the precomputed artifact?"
    } else {
        "Clear the checkpoint? The next run will resubmit every window."
    };
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| TransferError::Interaction(format!("Failed to read confirmation: {}", e)))
}

fn format_preparation(outcome: &PreparationOutcome, artifact: &Path) -> String {
    match outcome {
        PreparationOutcome::Reused => format!(
            "Precomputed artifact already present at {}; source not read",
            artifact.display()
        ),
        PreparationOutcome::Written { records } => format!(
            "Precomputed {} records into {}",
            records,
            artifact.display()
        ),
    }
}

fn format_submit_report(report: &SubmitReport) -> String {
    let checkpoint = report
        .checkpoint
        .map(|id| id.to_string())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "Submitted {} of {} windows ({} records, {} skipped); checkpoint: {}",
        report.submitted_windows,
        report.total_windows,
        report.submitted_records,
        report.skipped_windows,
        checkpoint
    )
}

fn format_run_report(report: &TransferReport) -> String {
    let preparation = match report.preparation {
        PreparationOutcome::Reused => "Reused precomputed artifact".to_string(),
        PreparationOutcome::Written { records } => format!("Precomputed {} records", records),
    };
    format!("{}\n{}", preparation, format_submit_report(&report.submission))
}

fn format_status_text(status: &PipelineStatus, paths: &StatePaths) -> String {
    let optional = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Artifact".to_string(), status.artifact.clone()]);
    table.add_row(vec![
        "Artifact present".to_string(),
        status.artifact_present.to_string(),
    ]);
    table.add_row(vec!["Records".to_string(), status.records.to_string()]);
    table.add_row(vec!["Window size".to_string(), status.window_size.to_string()]);
    table.add_row(vec![
        "Windows".to_string(),
        status.resume.total_windows.to_string(),
    ]);
    table.add_row(vec![
        "Confirmed windows".to_string(),
        status.resume.confirmed_windows.to_string(),
    ]);
    table.add_row(vec![
        "Resume from window".to_string(),
        optional(status.resume.resume_from.map(|i| i.to_string())),
    ]);
    table.add_row(vec![
        "Checkpoint".to_string(),
        optional(status.resume.checkpoint.map(|id| id.to_string())),
    ]);
    table.add_row(vec![
        "Checkpoint store".to_string(),
        paths.checkpoint.display().to_string(),
    ]);
    table.to_string()
}
