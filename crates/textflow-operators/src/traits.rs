//! Operator and sink traits + common interfaces.
//!
//! The assembler first calls `plan(...)` on every node in topological order to
//! derive output schemas and validate attribute bindings, and only then wires
//! inputs with `set_input(...)`. The engine drives the sink, which pulls
//! through the chain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use textflow_core::prelude::{FieldType, Schema, Tuple};

#[derive(Debug, Error)]
pub enum OpError {
    #[error("planning error: {0}")]
    Plan(String),

    #[error("attribute '{name}' not found in input schema {schema}")]
    UnresolvedAttribute { name: String, schema: Schema },

    #[error("attribute '{name}' has type {found} in input schema, expected {expected}")]
    AttributeType {
        name: String,
        expected: FieldType,
        found: FieldType,
    },

    #[error("data source error: {0}")]
    DataSource(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("operator used out of order: {0}")]
    State(String),

    #[error("execution error: {0}")]
    Exec(String),

    #[error("config serialization error: {0}")]
    Binding(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable snapshot of an operator's validated configuration: its type tag and
/// a JSON rendering of its parameters. Two operators built from the same
/// description compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorBinding {
    pub key: String,
    pub config: serde_json::Value,
}

impl OperatorBinding {
    pub fn new<C: Serialize>(key: &str, config: &C) -> Result<Self, OpError> {
        let config = serde_json::to_value(config)
            .map_err(|e| OpError::Binding(format!("{key}: {e}")))?;
        Ok(Self {
            key: key.to_string(),
            config,
        })
    }
}

/// A tuple-producing node.
///
/// Invariants:
/// - `plan` has no side effects and may be called before `set_input`.
/// - `next_tuple` is only valid between `open` and `close`.
/// - `Ok(None)` from `next_tuple` is end-of-stream and stays that way.
pub trait Operator: Send {
    /// Operator type tag (stable; matches the registry key).
    fn name(&self) -> &'static str;

    /// Number of upstream operators this node consumes (0 for sources).
    fn input_arity(&self) -> usize;

    /// Given input schemas, validate bindings and return the output schema.
    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError>;

    /// Attach an upstream operator whose output has `input_schema`.
    fn set_input(&mut self, input: Box<dyn Operator>, input_schema: &Schema)
        -> Result<(), OpError>;

    fn open(&mut self) -> Result<(), OpError>;

    fn next_tuple(&mut self) -> Result<Option<Tuple>, OpError>;

    fn close(&mut self) -> Result<(), OpError>;

    fn binding(&self) -> Result<OperatorBinding, OpError>;
}

/// A terminal node: consumes every tuple of its single input.
pub trait Sink: Send {
    fn name(&self) -> &'static str;

    /// Validate the input schema this sink will receive.
    fn plan(&self, input_schemas: &[Schema]) -> Result<(), OpError>;

    fn set_input(&mut self, input: Box<dyn Operator>, input_schema: &Schema)
        -> Result<(), OpError>;

    fn open(&mut self) -> Result<(), OpError>;

    /// Drain the input; returns how many tuples were consumed into the sink.
    /// `max_tuples` stops the drain early when reached.
    fn process_tuples(&mut self, max_tuples: Option<u64>) -> Result<u64, OpError>;

    fn close(&mut self) -> Result<(), OpError>;

    fn binding(&self) -> Result<OperatorBinding, OpError>;

    /// Tuples retained by in-memory sinks; empty for sinks that write elsewhere.
    fn collected(&self) -> &[Tuple] {
        &[]
    }

    /// Schema of the tuples this sink receives, once wired.
    fn input_schema(&self) -> Option<&Schema>;
}

/// Shared checks for a single-input node.
pub(crate) fn single_input<'a>(name: &str, input_schemas: &'a [Schema]) -> Result<&'a Schema, OpError> {
    match input_schemas {
        [schema] => Ok(schema),
        other => Err(OpError::Plan(format!(
            "{name} expects one input, got {}",
            other.len()
        ))),
    }
}

/// Resolve each attribute of `targets` against `schema` (same name and type);
/// returns their positions.
pub(crate) fn resolve_targets(targets: &Schema, schema: &Schema) -> Result<Vec<usize>, OpError> {
    targets
        .iter()
        .map(|t| {
            let idx = schema
                .index_of(&t.name)
                .ok_or_else(|| OpError::UnresolvedAttribute {
                    name: t.name.clone(),
                    schema: schema.clone(),
                })?;
            let found = schema.attributes()[idx].field_type;
            if found != t.field_type {
                return Err(OpError::AttributeType {
                    name: t.name.clone(),
                    expected: t.field_type,
                    found,
                });
            }
            Ok(idx)
        })
        .collect()
}

/// Upstream slot of a single-input node, with open/close bookkeeping.
#[derive(Default)]
pub(crate) struct Upstream {
    input: Option<Box<dyn Operator>>,
    opened: bool,
}

impl Upstream {
    pub(crate) fn attach(&mut self, name: &str, input: Box<dyn Operator>) -> Result<(), OpError> {
        if self.input.is_some() {
            return Err(OpError::Plan(format!("{name} already has an input")));
        }
        self.input = Some(input);
        Ok(())
    }

    pub(crate) fn open(&mut self, name: &str) -> Result<(), OpError> {
        let input = self
            .input
            .as_mut()
            .ok_or_else(|| OpError::State(format!("{name} opened without an input")))?;
        input.open()?;
        self.opened = true;
        Ok(())
    }

    pub(crate) fn next(&mut self, name: &str) -> Result<Option<Tuple>, OpError> {
        match self.input.as_mut() {
            Some(input) if self.opened => input.next_tuple(),
            _ => Err(OpError::State(format!("{name} pulled before open"))),
        }
    }

    pub(crate) fn close(&mut self) -> Result<(), OpError> {
        if !self.opened {
            return Ok(());
        }
        self.opened = false;
        match self.input.as_mut() {
            Some(input) => input.close(),
            None => Ok(()),
        }
    }
}
