//! Terminal sinks: consume tuples, produce nothing downstream.

use std::fs::File;
use std::io::{BufWriter, Write};

use serde::{Deserialize, Serialize};

use textflow_core::prelude::{Schema, Tuple};

use crate::pagination::{Pagination, Paginator};
use crate::traits::{single_input, OpError, Operator, OperatorBinding, Sink, Upstream};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TupleSinkConfig {
    #[serde(default)]
    pub pagination: Pagination,
}

/// Retains the tuples it consumes in memory.
pub struct TupleSink {
    config: TupleSinkConfig,
    input: Upstream,
    schema: Option<Schema>,
    collected: Vec<Tuple>,
    paginator: Paginator,
}

impl TupleSink {
    pub const KEY: &'static str = "TupleSink";

    pub fn new(config: TupleSinkConfig) -> Self {
        let paginator = Paginator::new(config.pagination);
        Self {
            config,
            input: Upstream::default(),
            schema: None,
            collected: vec![],
            paginator,
        }
    }

    pub fn into_tuples(self) -> Vec<Tuple> {
        self.collected
    }
}

impl Sink for TupleSink {
    fn name(&self) -> &'static str {
        Self::KEY
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<(), OpError> {
        single_input(Self::KEY, input_schemas).map(|_| ())
    }

    fn set_input(&mut self, input: Box<dyn Operator>, input_schema: &Schema) -> Result<(), OpError> {
        self.input.attach(Self::KEY, input)?;
        self.schema = Some(input_schema.clone());
        Ok(())
    }

    fn open(&mut self) -> Result<(), OpError> {
        self.input.open(Self::KEY)?;
        self.collected.clear();
        self.paginator.reset();
        Ok(())
    }

    fn process_tuples(&mut self, max_tuples: Option<u64>) -> Result<u64, OpError> {
        let mut count = 0u64;
        while !self.paginator.exhausted() && max_tuples.map_or(true, |m| count < m) {
            let Some(tuple) = self.input.next(Self::KEY)? else {
                break;
            };
            if self.paginator.admit() {
                self.collected.push(tuple);
                count += 1;
            }
        }
        Ok(count)
    }

    fn close(&mut self) -> Result<(), OpError> {
        self.input.close()
    }

    fn binding(&self) -> Result<OperatorBinding, OpError> {
        OperatorBinding::new(Self::KEY, &self.config)
    }

    fn collected(&self) -> &[Tuple] {
        &self.collected
    }

    fn input_schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSinkConfig {
    pub file_path: String,
}

/// Writes one JSON object per tuple (NDJSON), keyed by attribute name.
pub struct FileSink {
    config: FileSinkConfig,
    input: Upstream,
    schema: Option<Schema>,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    pub const KEY: &'static str = "FileSink";

    pub fn new(config: FileSinkConfig) -> Self {
        Self {
            config,
            input: Upstream::default(),
            schema: None,
            writer: None,
        }
    }
}

impl Sink for FileSink {
    fn name(&self) -> &'static str {
        Self::KEY
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<(), OpError> {
        single_input(Self::KEY, input_schemas).map(|_| ())
    }

    fn set_input(&mut self, input: Box<dyn Operator>, input_schema: &Schema) -> Result<(), OpError> {
        self.input.attach(Self::KEY, input)?;
        self.schema = Some(input_schema.clone());
        Ok(())
    }

    /// Creates the output file before touching the input, so a bad path
    /// leaves the upstream chain unopened.
    fn open(&mut self) -> Result<(), OpError> {
        let file = File::create(&self.config.file_path)?;
        self.writer = Some(BufWriter::new(file));
        if let Err(e) = self.input.open(Self::KEY) {
            self.writer = None;
            return Err(e);
        }
        Ok(())
    }

    fn process_tuples(&mut self, max_tuples: Option<u64>) -> Result<u64, OpError> {
        let (Some(writer), Some(schema)) = (self.writer.as_mut(), self.schema.as_ref()) else {
            return Err(OpError::State(format!("{} processed before open", Self::KEY)));
        };
        let mut count = 0u64;
        while max_tuples.map_or(true, |m| count < m) {
            let Some(tuple) = self.input.next(Self::KEY)? else {
                break;
            };
            let line = serde_json::to_string(&tuple.to_json_object(schema))
                .map_err(|e| OpError::Exec(e.to_string()))?;
            writeln!(writer, "{}", line)?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }

    fn close(&mut self) -> Result<(), OpError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        self.input.close()
    }

    fn binding(&self) -> Result<OperatorBinding, OpError> {
        OperatorBinding::new(Self::KEY, &self.config)
    }

    fn input_schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }
}
