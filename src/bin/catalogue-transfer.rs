//! Catalogue Transfer CLI Binary
//!
//! Command-line interface for the resumable catalogue migration pipeline.

use catalogue_transfer::logging::init_logging;
use catalogue_transfer::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let logging = cli.logging_config(&context.config().logging);
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            if e.is_transient() {
                eprintln!("Error: {} (re-run to resume from the last checkpoint)", e);
            } else {
                eprintln!("Error: {}", e);
            }
            process::exit(1);
        }
    }
}
