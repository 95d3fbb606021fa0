//! Workspace-relative state layout.

pub mod state_paths;
