//! Integration tests driving the public pipeline and CLI APIs

mod cli_contracts;
mod end_to_end;
mod resume_semantics;
mod support;
