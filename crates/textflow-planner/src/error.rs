//! Error taxonomy of the plan builder.
//!
//! `PropertyError`s come out of the shared resolvers, `BuildErrorKind` adds
//! dispatch and operator-specific failures, and `BuildError` attaches the
//! operator id. Only `BuildError` crosses the registry boundary.

use std::fmt;

use thiserror::Error;

use textflow_core::id::OperatorId;
use textflow_operators::OpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationKey {
    Limit,
    Offset,
}

impl fmt::Display for PaginationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaginationKey::Limit => "limit",
            PaginationKey::Offset => "offset",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("operator '{operator_id}' is missing required property '{key}'")]
    MissingProperty { operator_id: OperatorId, key: String },

    #[error("attribute names and attribute types are not coherent: {names} names, {types} types")]
    SchemaCoherence { names: usize, types: usize },

    #[error("attribute type '{token}' is not valid")]
    InvalidFieldType { token: String },

    #[error("attribute name '{name}' is declared more than once")]
    DuplicateAttribute { name: String },

    #[error("property '{key}' must be an integer, got '{value}'")]
    InvalidNumberFormat { key: String, value: String },

    #[error("operator '{operator_id}': {key} must be equal to or greater than 0, got {value}")]
    NegativePagination {
        operator_id: OperatorId,
        key: PaginationKey,
        value: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildErrorKind {
    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error("unknown operator type '{tag}'")]
    UnknownOperatorType { tag: String },

    #[error("invalid property '{key}': {reason}")]
    InvalidProperty { key: String, reason: String },
}

/// A failed operator build, attributed to its operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to build operator '{operator_id}': {cause}")]
pub struct BuildError {
    pub operator_id: OperatorId,
    #[source]
    pub cause: BuildErrorKind,
}

impl BuildError {
    pub fn new(operator_id: OperatorId, cause: impl Into<BuildErrorKind>) -> Self {
        Self {
            operator_id,
            cause: cause.into(),
        }
    }
}

fn join_ids(ids: &[OperatorId]) -> String {
    ids.iter().map(OperatorId::as_str).collect::<Vec<_>>().join(", ")
}

fn join_errors(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Structural violations found while linking built operators.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("plan has no operators")]
    EmptyPlan,

    #[error("plan has {count} operators, more than the configured maximum of {max}")]
    TooManyOperators { count: usize, max: usize },

    #[error("operator id '{operator_id}' is used more than once")]
    DuplicateOperator { operator_id: OperatorId },

    #[error("link {from} -> {to} names unknown operator '{missing}'")]
    UnknownLinkEndpoint {
        from: OperatorId,
        to: OperatorId,
        missing: OperatorId,
    },

    #[error("operator '{operator_id}' is linked to itself")]
    SelfLink { operator_id: OperatorId },

    #[error("link {from} -> {to} is declared more than once")]
    DuplicateLink { from: OperatorId, to: OperatorId },

    #[error("operator '{operator_id}' takes {expected} input(s) but has {found} incoming link(s)")]
    InputArity {
        operator_id: OperatorId,
        expected: usize,
        found: usize,
    },

    #[error("operator '{operator_id}' must have {expected} outgoing link(s) but has {found}")]
    OutputArity {
        operator_id: OperatorId,
        expected: usize,
        found: usize,
    },

    #[error("plan must have exactly one sink, found [{}]", join_ids(.sinks))]
    SinkCount { sinks: Vec<OperatorId> },

    #[error("plan contains a cycle through [{}]", join_ids(.operator_ids))]
    Cycle { operator_ids: Vec<OperatorId> },

    #[error("operators [{}] do not reach the sink", join_ids(.operator_ids))]
    Disconnected { operator_ids: Vec<OperatorId> },

    #[error("operator '{operator_id}' cannot bind its input: {source}")]
    UnresolvedAttribute {
        operator_id: OperatorId,
        #[source]
        source: OpError,
    },

    #[error("operator '{operator_id}' could not be wired: {source}")]
    Wiring {
        operator_id: OperatorId,
        #[source]
        source: OpError,
    },
}

impl GraphError {
    /// Operators implicated by this error, sorted.
    pub fn operator_ids(&self) -> Vec<OperatorId> {
        use GraphError::*;
        let mut ids = match self {
            EmptyPlan | TooManyOperators { .. } => vec![],
            DuplicateOperator { operator_id }
            | SelfLink { operator_id }
            | InputArity { operator_id, .. }
            | OutputArity { operator_id, .. }
            | UnresolvedAttribute { operator_id, .. }
            | Wiring { operator_id, .. } => vec![operator_id.clone()],
            UnknownLinkEndpoint { from, to, .. } | DuplicateLink { from, to } => {
                vec![from.clone(), to.clone()]
            }
            SinkCount { sinks } => sinks.clone(),
            Cycle { operator_ids } | Disconnected { operator_ids } => operator_ids.clone(),
        };
        ids.sort();
        ids
    }
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("{} operators failed to build: {}", .0.len(), join_errors(.0))]
    Builds(Vec<BuildError>),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("invalid plan document: {0}")]
    Document(String),

    #[error("operator '{operator_id}' has no stable configuration: {source}")]
    Binding {
        operator_id: OperatorId,
        #[source]
        source: OpError,
    },

    #[error("could not fingerprint plan: {0}")]
    Fingerprint(#[from] textflow_core::error::Error),
}

impl PlanError {
    /// Every build failure carried by this error, in operator-id order.
    pub fn build_errors(&self) -> Vec<&BuildError> {
        match self {
            PlanError::Build(e) => vec![e],
            PlanError::Builds(errs) => errs.iter().collect(),
            _ => vec![],
        }
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(e: serde_json::Error) -> Self {
        PlanError::Document(e.to_string())
    }
}

impl From<serde_yaml::Error> for PlanError {
    fn from(e: serde_yaml::Error) -> Self {
        PlanError::Document(e.to_string())
    }
}
