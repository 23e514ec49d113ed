//! Builders for the zero-input operators.

use textflow_operators::matcher::{KeywordMatchingType, KeywordPredicate};
use textflow_operators::source::{KeywordSource, KeywordSourceConfig, ScanSource, ScanSourceConfig};

use crate::attributes::build_attribute_list;
use crate::builder::{require_non_empty, BuildContext, BuiltOperator, OperatorBuilder};
use crate::error::BuildErrorKind;
use crate::pagination::find_pagination;
use crate::properties::{PropertyResolver, ATTRIBUTE_TYPES, DATA_SOURCE, KEYWORD, MATCHING_TYPE};

/// `ScanSource`: `dataSource`, `attributeNames`, `attributeTypes`, optional
/// `limit`/`offset`.
#[derive(Debug, Clone)]
pub struct ScanSourceBuilder {
    props: PropertyResolver,
}

impl ScanSourceBuilder {
    pub fn new(props: PropertyResolver) -> Self {
        Self { props }
    }

    pub fn config(&self) -> Result<ScanSourceConfig, BuildErrorKind> {
        Ok(ScanSourceConfig {
            data_source: require_non_empty(&self.props, DATA_SOURCE)?.trim().to_string(),
            schema: build_attribute_list(&self.props)?,
            pagination: find_pagination(&self.props)?,
        })
    }
}

impl OperatorBuilder for ScanSourceBuilder {
    fn properties(&self) -> &PropertyResolver {
        &self.props
    }

    fn try_build(&self, ctx: &BuildContext) -> Result<BuiltOperator, BuildErrorKind> {
        let op = ScanSource::new(self.config()?, ctx.catalog.clone());
        Ok(BuiltOperator::Operator(Box::new(op)))
    }
}

/// `KeywordSource`: the scan properties plus `keyword` and `matchingType`.
#[derive(Debug, Clone)]
pub struct KeywordSourceBuilder {
    props: PropertyResolver,
}

impl KeywordSourceBuilder {
    pub fn new(props: PropertyResolver) -> Self {
        Self { props }
    }

    pub fn config(&self) -> Result<KeywordSourceConfig, BuildErrorKind> {
        let data_source = require_non_empty(&self.props, DATA_SOURCE)?.trim().to_string();
        let (keyword, matching_type) = keyword_and_type(&self.props)?;
        Ok(KeywordSourceConfig {
            data_source,
            schema: build_attribute_list(&self.props)?,
            keyword,
            matching_type,
            pagination: find_pagination(&self.props)?,
        })
    }
}

impl OperatorBuilder for KeywordSourceBuilder {
    fn properties(&self) -> &PropertyResolver {
        &self.props
    }

    fn try_build(&self, ctx: &BuildContext) -> Result<BuiltOperator, BuildErrorKind> {
        let op = KeywordSource::new(self.config()?, ctx.catalog.clone()).map_err(|e| {
            BuildErrorKind::InvalidProperty {
                key: ATTRIBUTE_TYPES.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(BuiltOperator::Operator(Box::new(op)))
    }
}

/// `keyword` and `matchingType`, shared by the keyword source and matcher.
pub(crate) fn keyword_and_type(
    props: &PropertyResolver,
) -> Result<(String, KeywordMatchingType), BuildErrorKind> {
    let keyword = props.require(KEYWORD)?;
    let matching_type = props
        .require(MATCHING_TYPE)?
        .parse::<KeywordMatchingType>()
        .map_err(|e| BuildErrorKind::InvalidProperty {
            key: MATCHING_TYPE.to_string(),
            reason: e.to_string(),
        })?;
    KeywordPredicate::validate_keyword(keyword, matching_type)
        .map_err(|reason| BuildErrorKind::InvalidProperty {
            key: KEYWORD.to_string(),
            reason,
        })?;
    Ok((keyword.to_string(), matching_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropertyError;
    use crate::properties::OperatorProperties;
    use textflow_core::id::OperatorId;
    use textflow_operators::Pagination;

    fn resolver(props: OperatorProperties) -> PropertyResolver {
        PropertyResolver::new(OperatorId::new("src"), props)
    }

    fn scan_props() -> OperatorProperties {
        OperatorProperties::new()
            .with("dataSource", "people")
            .with("attributeNames", "name, bio")
            .with("attributeTypes", "string, text")
    }

    #[test]
    fn scan_config_collects_every_property() {
        let b = ScanSourceBuilder::new(resolver(scan_props().with("limit", "2")));
        let cfg = b.config().unwrap();
        assert_eq!(cfg.data_source, "people");
        assert_eq!(cfg.schema.len(), 2);
        assert_eq!(cfg.pagination, Pagination::new(Some(2), None));
    }

    #[test]
    fn scan_requires_data_source() {
        let b = ScanSourceBuilder::new(resolver(
            OperatorProperties::new()
                .with("attributeNames", "a")
                .with("attributeTypes", "text"),
        ));
        assert!(matches!(
            b.config(),
            Err(BuildErrorKind::Property(PropertyError::MissingProperty { key, .. })) if key == "dataSource"
        ));
    }

    #[test]
    fn blank_data_source_is_invalid() {
        let b = ScanSourceBuilder::new(resolver(scan_props().with("dataSource", "  ")));
        assert!(matches!(
            b.config(),
            Err(BuildErrorKind::InvalidProperty { key, .. }) if key == "dataSource"
        ));
    }

    #[test]
    fn keyword_source_parses_matching_type() {
        let b = KeywordSourceBuilder::new(resolver(
            scan_props()
                .with("keyword", "deep learning")
                .with("matchingType", "phrase_indexbased"),
        ));
        let cfg = b.config().unwrap();
        assert_eq!(cfg.matching_type, KeywordMatchingType::PhraseIndexBased);
        assert_eq!(cfg.keyword, "deep learning");
    }

    #[test]
    fn keyword_source_rejects_unknown_matching_type() {
        let b = KeywordSourceBuilder::new(resolver(
            scan_props()
                .with("keyword", "x")
                .with("matchingType", "FUZZY"),
        ));
        assert!(matches!(
            b.config(),
            Err(BuildErrorKind::InvalidProperty { key, .. }) if key == "matchingType"
        ));
    }

    #[test]
    fn keyword_source_needs_a_textual_attribute() {
        let b = KeywordSourceBuilder::new(resolver(
            OperatorProperties::new()
                .with("dataSource", "people")
                .with("attributeNames", "age")
                .with("attributeTypes", "integer")
                .with("keyword", "x")
                .with("matchingType", "PHRASE"),
        ));
        let err = b.try_build(&BuildContext::default()).unwrap_err();
        assert!(matches!(err, BuildErrorKind::InvalidProperty { .. }));
    }

    #[test]
    fn build_attaches_operator_id() {
        let b = ScanSourceBuilder::new(resolver(scan_props().with("offset", "-3")));
        let err = b.build(&BuildContext::default()).unwrap_err();
        assert_eq!(err.operator_id.as_str(), "src");
    }
}
