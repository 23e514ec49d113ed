#![forbid(unsafe_code)]
//! textflow-exec: drive an assembled plan to completion and record a
//! `RunManifest`.
//!
//! Execution is synchronous: the engine opens the sink (which opens its
//! upstream chain), drains it, and closes it. The sink is closed even when the
//! drain fails.

pub mod loader;
pub mod runtime;

pub use loader::{load_jsonl, load_jsonl_file};
pub use runtime::{Engine, ExecError, RunReport};
