#![forbid(unsafe_code)]
//! textflow-planner: from string-keyed operator descriptions to a validated,
//! wired operator graph.
//!
//! Layers, leaves first:
//!     * `properties`: read-only property maps and required/optional lookup
//!     * `attributes`: typed schema from `attributeNames`/`attributeTypes`
//!     * `pagination`: optional non-negative `limit`/`offset`
//!     * `builder`: one builder per operator type, dispatched by type tag
//!     * `assemble`: build every node, then link and validate the graph
//!     * `dsl`: JSON/YAML plan documents
//!
//! Every failure below the registry leaves it as a `BuildError` carrying the
//! operator id; graph-level failures are `GraphError`s naming the operators
//! involved.

pub mod assemble;
pub mod attributes;
pub mod builder;
pub mod descriptor;
pub mod dsl;
pub mod error;
pub mod pagination;
pub mod properties;

pub use assemble::{AssembledPlan, OperatorSummary, PlanAssembler, PlanSummary};
pub use attributes::build_attribute_list;
pub use builder::{BuildContext, BuiltOperator, OperatorBuilder, OperatorRegistry};
pub use descriptor::{Link, OperatorDescriptor};
pub use dsl::{parse_json_plan, parse_yaml_plan, DocumentConfig, PlanDocument};
pub use error::{BuildError, BuildErrorKind, GraphError, PaginationKey, PlanError, PropertyError};
pub use pagination::{find_limit, find_offset, find_pagination};
pub use properties::{OperatorProperties, PropertyResolver};
