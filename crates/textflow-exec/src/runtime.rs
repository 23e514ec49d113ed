//! Runtime: run an `AssembledPlan` and emit a `RunManifest`.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;

use textflow_core::config::EngineConfig;
use textflow_core::hash::hash_serde;
use textflow_core::id::OperatorId;
use textflow_core::manifest::RunManifest;
use textflow_core::prelude::{Schema, Tuple};
use textflow_operators::OpError;
use textflow_planner::AssembledPlan;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("operator '{operator_id}' failed: {source}")]
    Operator {
        operator_id: OperatorId,
        #[source]
        source: OpError,
    },
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("data load error: {0}")]
    Load(String),
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub manifest: RunManifest,
    /// Schema of the tuples the sink received.
    pub schema: Schema,
    /// Tuples retained by the sink; empty for sinks that write elsewhere.
    pub collected: Vec<Tuple>,
}

impl RunReport {
    /// Collected tuples as JSON objects keyed by attribute name.
    pub fn rows_json(&self) -> Vec<serde_json::Value> {
        self.collected
            .iter()
            .map(|t| t.to_json_object(&self.schema))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    cfg: EngineConfig,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Consume the plan and drain its sink.
    pub fn run(&self, plan: AssembledPlan) -> Result<RunReport, ExecError> {
        let plan_hash = plan.fingerprint();
        let (sink_id, mut sink) = plan.into_sink();
        let op_err = |source| ExecError::Operator {
            operator_id: sink_id.clone(),
            source,
        };

        let manifest = RunManifest::new(plan_hash, sink_id.clone(), now_millis());
        tracing::debug!(run = %manifest.id.0, sink = %sink_id, "run started");

        if let Err(e) = sink.open() {
            if let Err(close_err) = sink.close() {
                tracing::warn!(sink = %sink_id, error = %close_err, "close after failed open");
            }
            return Err(op_err(e));
        }
        let drained = sink.process_tuples(self.cfg.max_tuples);
        let closed = sink.close();
        let tuples_out = drained.map_err(op_err)?;
        closed.map_err(op_err)?;

        let collected = sink.collected().to_vec();
        let outputs_digest = if collected.len() as u64 == tuples_out {
            Some(hash_serde(&collected).map_err(|e| ExecError::Hash(e.to_string()))?)
        } else {
            None
        };
        let schema = sink.input_schema().cloned().unwrap_or_default();

        let manifest = manifest.finish(now_millis(), tuples_out, outputs_digest);
        tracing::info!(
            run = %manifest.id.0,
            sink = %sink_id,
            tuples = tuples_out,
            elapsed_ms = manifest.elapsed_ms(),
            "run finished"
        );

        Ok(RunReport {
            manifest,
            schema,
            collected,
        })
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
