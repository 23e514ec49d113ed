//! Run manifest: what ran, when, and what came out.
//!
//! Two runs of plans with the same fingerprint over the same data produce the
//! same `outputs_digest`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;
use crate::id::OperatorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: ManifestId,

    /// Fingerprint of the assembled plan (operator configs and links).
    pub plan_hash: Hash256,

    pub sink: OperatorId,

    /// Engine version string for provenance.
    pub engine_version: String,

    /// Tuples consumed into the sink.
    pub tuples_out: u64,

    /// Digest of the collected tuples, when the sink keeps them in memory.
    pub outputs_digest: Option<Hash256>,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn new(plan_hash: Hash256, sink: OperatorId, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            plan_hash,
            sink,
            engine_version: crate::VERSION.to_string(),
            tuples_out: 0,
            outputs_digest: None,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(mut self, finished_ms: u64, tuples_out: u64, outputs_digest: Option<Hash256>) -> Self {
        self.finished_ms = finished_ms;
        self.tuples_out = tuples_out;
        self.outputs_digest = outputs_digest;
        self
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.finished_ms.saturating_sub(self.started_ms)
    }
}
