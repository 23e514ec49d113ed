//! Operator property maps and the resolver every builder reads them through.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use textflow_core::id::OperatorId;

use crate::error::PropertyError;

/// Comma-separated attribute names.
pub const ATTRIBUTE_NAMES: &str = "attributeNames";
/// Comma-separated, case-insensitive field type names.
pub const ATTRIBUTE_TYPES: &str = "attributeTypes";
pub const LIMIT: &str = "limit";
pub const OFFSET: &str = "offset";
pub const DATA_SOURCE: &str = "dataSource";
pub const REGEX: &str = "regex";
pub const KEYWORD: &str = "keyword";
pub const MATCHING_TYPE: &str = "matchingType";
pub const FILE_PATH: &str = "filePath";

/// Flat string → string map describing one operator. All values are strings,
/// whatever their logical type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorProperties(BTreeMap<String, String>);

impl OperatorProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and programmatic plans.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for OperatorProperties {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OperatorProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Read-only view of one operator's properties, tagged with its id so every
/// lookup failure is attributable.
#[derive(Debug, Clone)]
pub struct PropertyResolver {
    operator_id: OperatorId,
    properties: OperatorProperties,
}

impl PropertyResolver {
    pub fn new(operator_id: OperatorId, properties: OperatorProperties) -> Self {
        Self {
            operator_id,
            properties,
        }
    }

    pub fn operator_id(&self) -> &OperatorId {
        &self.operator_id
    }

    /// The value under `key`, or `MissingProperty` if the key is absent.
    /// An empty string is a present value.
    pub fn require(&self, key: &str) -> Result<&str, PropertyError> {
        self.optional(key)
            .ok_or_else(|| PropertyError::MissingProperty {
                operator_id: self.operator_id.clone(),
                key: key.to_string(),
            })
    }

    /// The value under `key`, or `None` if absent.
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.properties.0.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(props: OperatorProperties) -> PropertyResolver {
        PropertyResolver::new(OperatorId::new("op"), props)
    }

    #[test]
    fn require_fails_exactly_when_absent() {
        let r = resolver(
            OperatorProperties::new()
                .with("regex", "a+")
                .with("other", "x"),
        );
        assert_eq!(r.require("regex"), Ok("a+"));
        assert_eq!(
            r.require("keyword"),
            Err(PropertyError::MissingProperty {
                operator_id: OperatorId::new("op"),
                key: "keyword".into(),
            })
        );
    }

    #[test]
    fn empty_string_is_present() {
        let r = resolver(OperatorProperties::new().with("limit", ""));
        assert_eq!(r.optional("limit"), Some(""));
        assert_eq!(r.require("limit"), Ok(""));
        assert_eq!(r.optional("offset"), None);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let r = resolver([("Regex", "x")].into_iter().collect());
        assert!(r.require("regex").is_err());
        assert_eq!(r.operator_id().as_str(), "op");
    }
}
