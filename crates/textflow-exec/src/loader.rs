//! JSON-lines data loading into catalog data sets.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use textflow_core::prelude::{Schema, Tuple};
use textflow_operators::DataSet;

use crate::runtime::ExecError;

/// Read one JSON object per line, typed by `schema`. Blank lines are skipped;
/// keys missing from an object become nulls.
pub fn load_jsonl<R: BufRead>(reader: R, schema: &Schema) -> Result<DataSet, ExecError> {
    let mut tuples = vec![];
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ExecError::Load(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(&line)
            .map_err(|e| ExecError::Load(format!("line {}: {e}", idx + 1)))?;
        let tuple = Tuple::from_json_object(&value, schema)
            .map_err(|e| ExecError::Load(format!("line {}: {e}", idx + 1)))?;
        tuples.push(tuple);
    }
    DataSet::new(schema.clone(), tuples).map_err(|e| ExecError::Load(e.to_string()))
}

pub fn load_jsonl_file(path: impl AsRef<Path>, schema: &Schema) -> Result<DataSet, ExecError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| ExecError::Load(format!("{}: {e}", path.display())))?;
    let data = load_jsonl(BufReader::new(file), schema)?;
    tracing::debug!(path = %path.display(), rows = data.len(), "loaded data set");
    Ok(data)
}
