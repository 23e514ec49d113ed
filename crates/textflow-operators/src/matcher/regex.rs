//! Regular-expression matcher over text attributes.

use regex::Regex;
use serde::{Deserialize, Serialize};

use textflow_core::prelude::{FieldValue, Schema, Tuple};

use crate::pagination::{Pagination, Paginator};
use crate::traits::{resolve_targets, single_input, OpError, Operator, OperatorBinding, Upstream};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexMatcherConfig {
    pub regex: String,
    /// Attributes to search; each must exist in the input with the same type.
    pub attributes: Schema,
    #[serde(default)]
    pub pagination: Pagination,
}

pub struct RegexMatcher {
    config: RegexMatcherConfig,
    pattern: Regex,
    input: Upstream,
    targets: Vec<usize>,
    paginator: Paginator,
}

impl RegexMatcher {
    pub const KEY: &'static str = "RegexMatcher";

    /// Compiles the pattern; an invalid pattern is a planning error.
    pub fn new(config: RegexMatcherConfig) -> Result<Self, OpError> {
        let pattern = Regex::new(&config.regex).map_err(|e| OpError::Plan(e.to_string()))?;
        let paginator = Paginator::new(config.pagination);
        Ok(Self {
            config,
            pattern,
            input: Upstream::default(),
            targets: vec![],
            paginator,
        })
    }

    pub fn config(&self) -> &RegexMatcherConfig {
        &self.config
    }

    fn matches(&self, tuple: &Tuple) -> bool {
        self.targets.iter().any(|&idx| {
            tuple
                .field(idx)
                .and_then(FieldValue::as_str)
                .is_some_and(|v| self.pattern.is_match(v))
        })
    }
}

impl Operator for RegexMatcher {
    fn name(&self) -> &'static str {
        Self::KEY
    }

    fn input_arity(&self) -> usize {
        1
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        let schema = single_input(Self::KEY, input_schemas)?;
        resolve_targets(&self.config.attributes, schema)?;
        Ok(schema.clone())
    }

    fn set_input(&mut self, input: Box<dyn Operator>, input_schema: &Schema) -> Result<(), OpError> {
        let targets = resolve_targets(&self.config.attributes, input_schema)?;
        self.input.attach(Self::KEY, input)?;
        self.targets = targets;
        Ok(())
    }

    fn open(&mut self) -> Result<(), OpError> {
        self.input.open(Self::KEY)?;
        self.paginator.reset();
        Ok(())
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>, OpError> {
        while !self.paginator.exhausted() {
            let Some(tuple) = self.input.next(Self::KEY)? else {
                break;
            };
            if self.matches(&tuple) && self.paginator.admit() {
                return Ok(Some(tuple));
            }
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<(), OpError> {
        self.input.close()
    }

    fn binding(&self) -> Result<OperatorBinding, OpError> {
        OperatorBinding::new(Self::KEY, &self.config)
    }
}
