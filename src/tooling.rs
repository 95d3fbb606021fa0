//! Tooling & Integration Layer
//!
//! Command-line entry points over the transfer pipeline.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
