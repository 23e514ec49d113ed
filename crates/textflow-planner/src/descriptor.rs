//! Operator descriptions and links as they appear in plan documents.

use serde::{Deserialize, Serialize};

use textflow_core::id::OperatorId;

use crate::properties::{OperatorProperties, PropertyResolver};

/// One operator: id, type tag, and its flat string properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorDescriptor {
    #[serde(alias = "operatorID")]
    pub operator_id: OperatorId,
    #[serde(alias = "operatorType")]
    pub operator_type: String,
    #[serde(flatten)]
    pub properties: OperatorProperties,
}

impl OperatorDescriptor {
    pub fn new(
        operator_id: impl Into<OperatorId>,
        operator_type: impl Into<String>,
        properties: OperatorProperties,
    ) -> Self {
        Self {
            operator_id: operator_id.into(),
            operator_type: operator_type.into(),
            properties,
        }
    }

    pub fn resolver(&self) -> PropertyResolver {
        PropertyResolver::new(self.operator_id.clone(), self.properties.clone())
    }
}

/// Directed edge: `from` feeds `to`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link {
    pub from: OperatorId,
    pub to: OperatorId,
}

impl Link {
    pub fn new(from: impl Into<OperatorId>, to: impl Into<OperatorId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
