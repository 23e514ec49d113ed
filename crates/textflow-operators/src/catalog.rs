//! In-memory catalog of named data sets.
//!
//! Sources reference data by name only; the catalog is handed to builders
//! through the build context and read when a source is opened.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use textflow_core::prelude::{Schema, Tuple};

use crate::traits::OpError;

/// A named, immutable collection of tuples laid out by `schema`.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub schema: Schema,
    pub tuples: Arc<Vec<Tuple>>,
}

impl DataSet {
    /// Build a data set, checking every tuple against the schema.
    pub fn new(schema: Schema, tuples: Vec<Tuple>) -> Result<Self, OpError> {
        if let Some(pos) = tuples.iter().position(|t| !t.conforms_to(&schema)) {
            return Err(OpError::Schema(format!(
                "tuple {pos} does not conform to schema {schema}"
            )));
        }
        Ok(Self {
            schema,
            tuples: Arc::new(tuples),
        })
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }
}

/// Thread-safe name → data set map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    data: Arc<RwLock<HashMap<String, DataSet>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a data set under `name`.
    pub fn insert(&self, name: impl Into<String>, data: DataSet) {
        let mut map = self.data.write().unwrap_or_else(|e| e.into_inner());
        map.insert(name.into(), data);
    }

    pub fn get(&self, name: &str) -> Option<DataSet> {
        let map = self.data.read().unwrap_or_else(|e| e.into_inner());
        map.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        let map = self.data.read().unwrap_or_else(|e| e.into_inner());
        map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        let map = self.data.read().unwrap_or_else(|e| e.into_inner());
        map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> Vec<String> {
        let map = self.data.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        names
    }
}
