#![forbid(unsafe_code)]
//! textflow-core: the data model shared by every textflow crate.
//!
//! - `schema`: `FieldType`, `Attribute`, `Schema` (positional, name-unique).
//! - `types`: `FieldValue` and `Tuple`, the records that flow between operators.
//! - `id`: the string-backed `OperatorId`.
//! - `config`: plan/engine configuration with env overrides.
//! - `hash`: stable blake3 fingerprints for plan documents.
//! - `manifest`: the record a run leaves behind.
//!
//! No IO lives here.

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod manifest;
pub mod prelude;
pub mod schema;
pub mod types;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
