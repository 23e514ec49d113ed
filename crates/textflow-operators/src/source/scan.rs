//! Pass-through scan over a catalog data set.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use textflow_core::prelude::{Schema, Tuple};

use crate::catalog::MemoryCatalog;
use crate::pagination::{Pagination, Paginator};
use crate::traits::{OpError, Operator, OperatorBinding};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSourceConfig {
    pub data_source: String,
    /// Declared schema; must equal the stored data set's schema at open.
    pub schema: Schema,
    #[serde(default)]
    pub pagination: Pagination,
}

pub struct ScanSource {
    config: ScanSourceConfig,
    catalog: MemoryCatalog,
    rows: Option<Arc<Vec<Tuple>>>,
    cursor: usize,
    paginator: Paginator,
}

impl ScanSource {
    pub const KEY: &'static str = "ScanSource";

    pub fn new(config: ScanSourceConfig, catalog: MemoryCatalog) -> Self {
        let paginator = Paginator::new(config.pagination);
        Self {
            config,
            catalog,
            rows: None,
            cursor: 0,
            paginator,
        }
    }

    pub fn config(&self) -> &ScanSourceConfig {
        &self.config
    }

    /// Next stored row, ignoring pagination.
    pub(crate) fn next_row(&mut self) -> Result<Option<Tuple>, OpError> {
        let rows = self
            .rows
            .as_ref()
            .ok_or_else(|| OpError::State(format!("{} pulled before open", Self::KEY)))?;
        let row = rows.get(self.cursor).cloned();
        if row.is_some() {
            self.cursor += 1;
        }
        Ok(row)
    }
}

impl Operator for ScanSource {
    fn name(&self) -> &'static str {
        Self::KEY
    }

    fn input_arity(&self) -> usize {
        0
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        if !input_schemas.is_empty() {
            return Err(OpError::Plan(format!("{} takes no input", Self::KEY)));
        }
        Ok(self.config.schema.clone())
    }

    fn set_input(&mut self, _input: Box<dyn Operator>, _schema: &Schema) -> Result<(), OpError> {
        Err(OpError::Plan(format!("{} takes no input", Self::KEY)))
    }

    fn open(&mut self) -> Result<(), OpError> {
        let data = self.catalog.get(&self.config.data_source).ok_or_else(|| {
            OpError::DataSource(format!("unknown data source '{}'", self.config.data_source))
        })?;
        if data.schema != self.config.schema {
            return Err(OpError::Schema(format!(
                "data source '{}' has schema {}, declared {}",
                self.config.data_source, data.schema, self.config.schema
            )));
        }
        tracing::debug!(
            data_source = %self.config.data_source,
            rows = data.len(),
            "scan opened"
        );
        self.rows = Some(data.tuples);
        self.cursor = 0;
        self.paginator.reset();
        Ok(())
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>, OpError> {
        while !self.paginator.exhausted() {
            match self.next_row()? {
                Some(t) if self.paginator.admit() => return Ok(Some(t)),
                Some(_) => continue,
                None => break,
            }
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<(), OpError> {
        self.rows = None;
        Ok(())
    }

    fn binding(&self) -> Result<OperatorBinding, OpError> {
        OperatorBinding::new(Self::KEY, &self.config)
    }
}
