//! Plan documents: operators, links, and optional config overrides.
//!
//! ```yaml
//! config: { fail_fast: false }
//! operators:
//!   - { operator_id: src, operator_type: ScanSource, dataSource: people,
//!       attributeNames: "name, bio", attributeTypes: "string, text" }
//!   - { operator_id: m1, operator_type: RegexMatcher, regex: "sal[a-z]+",
//!       attributeNames: bio, attributeTypes: text, limit: "5" }
//!   - { operator_id: out, operator_type: TupleSink }
//! links:
//!   - { from: src, to: m1 }
//!   - { from: m1, to: out }
//! ```
//!
//! Every property value is a string, including `limit` and `offset`.

pub mod json;
pub mod yaml;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use textflow_core::config::{EngineConfig, PlanConfig};
use textflow_core::prelude::Schema;

use crate::attributes::build_attribute_list;
use crate::descriptor::{Link, OperatorDescriptor};
use crate::error::{BuildError, PlanError};
use crate::properties::DATA_SOURCE;

pub use json::parse_json_plan;
pub use yaml::parse_yaml_plan;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<DocumentConfig>,
    pub operators: Vec<OperatorDescriptor>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Per-document overrides; unset fields keep the caller's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    pub fail_fast: Option<bool>,
    pub max_operators: Option<usize>,
    pub max_tuples: Option<u64>,
}

impl DocumentConfig {
    pub fn apply_plan(&self, cfg: &mut PlanConfig) {
        if let Some(v) = self.fail_fast {
            cfg.fail_fast = v;
        }
        if let Some(v) = self.max_operators {
            cfg.max_operators = v;
        }
    }

    pub fn apply_engine(&self, cfg: &mut EngineConfig) {
        if let Some(v) = self.max_tuples {
            cfg.max_tuples = Some(v);
        }
    }
}

impl PlanDocument {
    /// `base` with this document's overrides applied.
    pub fn plan_config(&self, base: PlanConfig) -> PlanConfig {
        let mut cfg = base;
        if let Some(doc) = &self.config {
            doc.apply_plan(&mut cfg);
        }
        cfg
    }

    pub fn engine_config(&self, base: EngineConfig) -> EngineConfig {
        let mut cfg = base;
        if let Some(doc) = &self.config {
            doc.apply_engine(&mut cfg);
        }
        cfg
    }

    /// Schemas declared for each named data source, for loaders that need to
    /// type raw records before the plan is built. Operators declaring the
    /// same data source must agree on its schema.
    pub fn data_sources(&self) -> Result<BTreeMap<String, Schema>, PlanError> {
        let mut out: BTreeMap<String, Schema> = BTreeMap::new();
        for d in &self.operators {
            let props = d.resolver();
            let Some(name) = props.optional(DATA_SOURCE) else {
                continue;
            };
            let name = name.trim().to_string();
            let schema = build_attribute_list(&props)
                .map_err(|e| PlanError::Build(BuildError::new(d.operator_id.clone(), e)))?;
            match out.get(&name) {
                Some(existing) if *existing != schema => {
                    return Err(PlanError::Document(format!(
                        "data source '{name}' is declared as {existing} and as {schema}"
                    )));
                }
                Some(_) => {}
                None => {
                    out.insert(name, schema);
                }
            }
        }
        Ok(out)
    }
}
