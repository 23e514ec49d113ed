//! Builders for the single-input matchers.

use textflow_operators::matcher::{KeywordMatcher, KeywordMatcherConfig, RegexMatcher, RegexMatcherConfig};

use crate::attributes::build_attribute_list;
use crate::builder::source::keyword_and_type;
use crate::builder::{require_non_empty, require_textual_targets, BuildContext, BuiltOperator, OperatorBuilder};
use crate::error::BuildErrorKind;
use crate::pagination::find_pagination;
use crate::properties::{PropertyResolver, ATTRIBUTE_TYPES, REGEX};

/// `RegexMatcher`: `regex`, target attributes, optional `limit`/`offset`.
#[derive(Debug, Clone)]
pub struct RegexMatcherBuilder {
    props: PropertyResolver,
}

impl RegexMatcherBuilder {
    pub fn new(props: PropertyResolver) -> Self {
        Self { props }
    }

    pub fn config(&self) -> Result<RegexMatcherConfig, BuildErrorKind> {
        let regex = require_non_empty(&self.props, REGEX)?.to_string();
        let attributes = build_attribute_list(&self.props)?;
        require_textual_targets(ATTRIBUTE_TYPES, &attributes)?;
        Ok(RegexMatcherConfig {
            regex,
            attributes,
            pagination: find_pagination(&self.props)?,
        })
    }
}

impl OperatorBuilder for RegexMatcherBuilder {
    fn properties(&self) -> &PropertyResolver {
        &self.props
    }

    fn try_build(&self, _ctx: &BuildContext) -> Result<BuiltOperator, BuildErrorKind> {
        let op = RegexMatcher::new(self.config()?).map_err(|e| BuildErrorKind::InvalidProperty {
            key: REGEX.to_string(),
            reason: e.to_string(),
        })?;
        Ok(BuiltOperator::Operator(Box::new(op)))
    }
}

/// `KeywordMatcher`: `keyword`, `matchingType`, target attributes, optional
/// `limit`/`offset`.
#[derive(Debug, Clone)]
pub struct KeywordMatcherBuilder {
    props: PropertyResolver,
}

impl KeywordMatcherBuilder {
    pub fn new(props: PropertyResolver) -> Self {
        Self { props }
    }

    pub fn config(&self) -> Result<KeywordMatcherConfig, BuildErrorKind> {
        let (keyword, matching_type) = keyword_and_type(&self.props)?;
        let attributes = build_attribute_list(&self.props)?;
        require_textual_targets(ATTRIBUTE_TYPES, &attributes)?;
        Ok(KeywordMatcherConfig {
            keyword,
            matching_type,
            attributes,
            pagination: find_pagination(&self.props)?,
        })
    }
}

impl OperatorBuilder for KeywordMatcherBuilder {
    fn properties(&self) -> &PropertyResolver {
        &self.props
    }

    fn try_build(&self, _ctx: &BuildContext) -> Result<BuiltOperator, BuildErrorKind> {
        Ok(BuiltOperator::Operator(Box::new(KeywordMatcher::new(self.config()?))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PaginationKey, PropertyError};
    use crate::properties::OperatorProperties;
    use textflow_core::id::OperatorId;
    use textflow_operators::matcher::KeywordMatchingType;
    use textflow_operators::Pagination;

    fn regex(props: OperatorProperties) -> RegexMatcherBuilder {
        RegexMatcherBuilder::new(PropertyResolver::new(OperatorId::new("m1"), props))
    }

    fn bio() -> OperatorProperties {
        OperatorProperties::new()
            .with("attributeNames", "bio")
            .with("attributeTypes", "text")
    }

    #[test]
    fn regex_config_is_typed() {
        let cfg = regex(bio().with("regex", "sal[a-z]+").with("offset", "1"))
            .config()
            .unwrap();
        assert_eq!(cfg.regex, "sal[a-z]+");
        assert_eq!(cfg.attributes.attribute(0).map(|a| a.name.as_str()), Some("bio"));
        assert_eq!(cfg.pagination, Pagination::new(None, Some(1)));
    }

    #[test]
    fn negative_limit_surfaces_as_property_error() {
        let err = regex(bio().with("regex", "a").with("limit", "-5"))
            .build(&BuildContext::default())
            .unwrap_err();
        assert_eq!(err.operator_id.as_str(), "m1");
        assert!(matches!(
            err.cause,
            BuildErrorKind::Property(PropertyError::NegativePagination {
                key: PaginationKey::Limit,
                value: -5,
                ..
            })
        ));
    }

    #[test]
    fn bad_pattern_is_rejected_at_build() {
        let err = regex(bio().with("regex", "(unclosed"))
            .build(&BuildContext::default())
            .unwrap_err();
        assert!(matches!(err.cause, BuildErrorKind::InvalidProperty { ref key, .. } if key == "regex"));
    }

    #[test]
    fn matcher_targets_must_be_textual() {
        let err = regex(
            OperatorProperties::new()
                .with("regex", "1")
                .with("attributeNames", "age")
                .with("attributeTypes", "integer"),
        )
        .config()
        .unwrap_err();
        assert!(matches!(err, BuildErrorKind::InvalidProperty { .. }));
    }

    #[test]
    fn matcher_needs_at_least_one_target() {
        let err = regex(
            OperatorProperties::new()
                .with("regex", "1")
                .with("attributeNames", "")
                .with("attributeTypes", ""),
        )
        .config()
        .unwrap_err();
        assert!(err.to_string().contains("at least one attribute"));
    }

    #[test]
    fn keyword_matcher_config() {
        let b = KeywordMatcherBuilder::new(PropertyResolver::new(
            OperatorId::new("k"),
            bio().with("keyword", "Salary").with("matchingType", "CONJUNCTION_INDEXBASED"),
        ));
        let cfg = b.config().unwrap();
        assert_eq!(cfg.matching_type, KeywordMatchingType::Conjunction);
        assert!(cfg.pagination.is_unbounded());
    }

    #[test]
    fn keyword_without_tokens_is_rejected() {
        let b = KeywordMatcherBuilder::new(PropertyResolver::new(
            OperatorId::new("k"),
            bio().with("keyword", "--").with("matchingType", "PHRASE"),
        ));
        assert!(matches!(
            b.config(),
            Err(BuildErrorKind::InvalidProperty { key, .. }) if key == "keyword"
        ));
    }
}
