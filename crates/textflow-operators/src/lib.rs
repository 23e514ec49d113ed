#![forbid(unsafe_code)]
//! textflow-operators: pull-based operators the plan builder instantiates.
//!
//! Design intent:
//! - Operators are synchronous and pull one tuple at a time
//!   (`open` / `next_tuple` / `close`).
//! - Sinks are a separate trait: they consume their input and produce nothing.
//! - Every operator is constructed from a typed, already-validated config and
//!   can report it back as an `OperatorBinding` for explain/idempotence checks.
//! - Schema binding (`plan`) is pure so a whole graph can be validated before
//!   any operator is wired.

pub mod catalog;
pub mod matcher;
pub mod pagination;
pub mod sink;
pub mod source;
pub mod traits;

pub use catalog::{DataSet, MemoryCatalog};
pub use pagination::{Pagination, Paginator};
pub use traits::{OpError, Operator, OperatorBinding, Sink};
