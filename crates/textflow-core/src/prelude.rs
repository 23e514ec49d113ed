//! Convenient re-exports for downstream crates.

pub use crate::config::{EngineConfig, PlanConfig};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::id::OperatorId;
pub use crate::manifest::RunManifest;
pub use crate::schema::{Attribute, FieldType, Schema};
pub use crate::types::{FieldValue, Tuple};
