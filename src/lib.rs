//! Catalogue Transfer: Resumable Product Catalogue Migration
//!
//! Rebuilds a product hierarchy from flat, parent-referencing records, precomputes
//! every product's ancestor chain into a durable artifact, and submits the result to
//! a bulk-create datastore in fixed-size windows gated by a crash-safe checkpoint.

pub mod ancestry;
pub mod concurrency;
pub mod config;
pub mod datastore;
pub mod error;
pub mod logging;
pub mod store;
pub mod tooling;
pub mod transfer;
pub mod tree;
pub mod types;
