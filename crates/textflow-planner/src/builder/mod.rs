//! Per-type operator builders and the registry that dispatches to them.
//!
//! A builder owns the `PropertyResolver` for one operator and turns it into a
//! constructed operator, or into a `BuildErrorKind` describing the first
//! invalid property. The registry attaches the operator id.

pub mod matcher;
pub mod registry;
pub mod sink;
pub mod source;

use textflow_core::prelude::Schema;
use textflow_operators::{MemoryCatalog, OpError, Operator, OperatorBinding, Sink};

use crate::error::{BuildError, BuildErrorKind};
use crate::properties::PropertyResolver;

pub use matcher::{KeywordMatcherBuilder, RegexMatcherBuilder};
pub use registry::{BuilderFactory, OperatorRegistry};
pub use sink::{FileSinkBuilder, TupleSinkBuilder};
pub use source::{KeywordSourceBuilder, ScanSourceBuilder};

/// Shared handles a builder may hand to the operator it constructs.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub catalog: MemoryCatalog,
}

impl BuildContext {
    pub fn new(catalog: MemoryCatalog) -> Self {
        Self { catalog }
    }
}

/// A constructed plan node: either a tuple-producing operator or a sink.
pub enum BuiltOperator {
    Operator(Box<dyn Operator>),
    Sink(Box<dyn Sink>),
}

impl BuiltOperator {
    pub fn name(&self) -> &'static str {
        match self {
            BuiltOperator::Operator(op) => op.name(),
            BuiltOperator::Sink(sink) => sink.name(),
        }
    }

    pub fn binding(&self) -> Result<OperatorBinding, OpError> {
        match self {
            BuiltOperator::Operator(op) => op.binding(),
            BuiltOperator::Sink(sink) => sink.binding(),
        }
    }

    pub fn is_sink(&self) -> bool {
        matches!(self, BuiltOperator::Sink(_))
    }

    pub fn input_arity(&self) -> usize {
        match self {
            BuiltOperator::Operator(op) => op.input_arity(),
            BuiltOperator::Sink(_) => 1,
        }
    }
}

impl std::fmt::Debug for BuiltOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltOperator")
            .field("name", &self.name())
            .field("binding", &self.binding().ok())
            .finish()
    }
}

pub trait OperatorBuilder: Send + Sync {
    fn properties(&self) -> &PropertyResolver;

    /// Validate every property this operator type needs and construct it.
    fn try_build(&self, ctx: &BuildContext) -> Result<BuiltOperator, BuildErrorKind>;

    fn build(&self, ctx: &BuildContext) -> Result<BuiltOperator, BuildError> {
        self.try_build(ctx)
            .map_err(|cause| BuildError::new(self.properties().operator_id().clone(), cause))
    }
}

/// A required property that must not be blank.
pub(crate) fn require_non_empty<'a>(
    props: &'a PropertyResolver,
    key: &str,
) -> Result<&'a str, BuildErrorKind> {
    let value = props.require(key)?;
    if value.trim().is_empty() {
        return Err(BuildErrorKind::InvalidProperty {
            key: key.to_string(),
            reason: "must not be empty".into(),
        });
    }
    Ok(value)
}

/// Matcher targets: at least one attribute, each `string` or `text`.
pub(crate) fn require_textual_targets(key: &str, schema: &Schema) -> Result<(), BuildErrorKind> {
    if schema.is_empty() {
        return Err(BuildErrorKind::InvalidProperty {
            key: key.to_string(),
            reason: "at least one attribute is required".into(),
        });
    }
    match schema.iter().find(|a| !a.field_type.is_textual()) {
        Some(attr) => Err(BuildErrorKind::InvalidProperty {
            key: key.to_string(),
            reason: format!(
                "attribute '{}' has type {}, only string and text can be matched",
                attr.name, attr.field_type
            ),
        }),
        None => Ok(()),
    }
}
