//! Plan-builder and engine configuration that downstream crates can
//! serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Stop at the first failed operator build. When false, every operator is
    /// built and all failures are reported together (sorted by operator id).
    pub fail_fast: bool,

    /// Upper bound on operators in one plan document.
    pub max_operators: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            fail_fast: true,
            max_operators: 1024,
        }
    }
}

impl PlanConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TEXTFLOW_FAIL_FAST`: `true`/`false`
    /// - `TEXTFLOW_MAX_OPERATORS`: operator count cap
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TEXTFLOW_FAIL_FAST") {
            if let Some(v) = parse_bool(&s) {
                cfg.fail_fast = v;
            }
        }

        if let Ok(s) = std::env::var("TEXTFLOW_MAX_OPERATORS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_operators = v;
            }
        }

        cfg
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Optional cap on tuples drained into the sink in one run.
    pub max_tuples: Option<u64>,
}

impl EngineConfig {
    /// Environment variables:
    /// - `TEXTFLOW_MAX_TUPLES`: tuple cap per run
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TEXTFLOW_MAX_TUPLES") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.max_tuples = Some(v);
            }
        }

        cfg
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
