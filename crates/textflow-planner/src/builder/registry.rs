//! Type-tag → builder dispatch.

use std::collections::HashMap;

use textflow_operators::matcher::{KeywordMatcher, RegexMatcher};
use textflow_operators::sink::{FileSink, TupleSink};
use textflow_operators::source::{KeywordSource, ScanSource};

use crate::builder::matcher::{KeywordMatcherBuilder, RegexMatcherBuilder};
use crate::builder::sink::{FileSinkBuilder, TupleSinkBuilder};
use crate::builder::source::{KeywordSourceBuilder, ScanSourceBuilder};
use crate::builder::{BuildContext, BuiltOperator, OperatorBuilder};
use crate::descriptor::OperatorDescriptor;
use crate::error::{BuildError, BuildErrorKind};
use crate::properties::PropertyResolver;

pub type BuilderFactory = fn(PropertyResolver) -> Box<dyn OperatorBuilder>;

/// Registered operator types. Tags are matched exactly (case-sensitive).
#[derive(Clone)]
pub struct OperatorRegistry {
    factories: HashMap<String, BuilderFactory>,
}

impl OperatorRegistry {
    /// A registry with no operator types.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Every built-in operator type.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register(ScanSource::KEY, |p| Box::new(ScanSourceBuilder::new(p)));
        reg.register(KeywordSource::KEY, |p| Box::new(KeywordSourceBuilder::new(p)));
        reg.register(RegexMatcher::KEY, |p| Box::new(RegexMatcherBuilder::new(p)));
        reg.register(KeywordMatcher::KEY, |p| Box::new(KeywordMatcherBuilder::new(p)));
        reg.register(TupleSink::KEY, |p| Box::new(TupleSinkBuilder::new(p)));
        reg.register(FileSink::KEY, |p| Box::new(FileSinkBuilder::new(p)));
        reg
    }

    /// Register (or replace) the builder for `tag`.
    pub fn register(&mut self, tag: impl Into<String>, factory: BuilderFactory) {
        self.factories.insert(tag.into(), factory);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// The builder for `descriptor`'s type, bound to its properties.
    pub fn builder_for(
        &self,
        descriptor: &OperatorDescriptor,
    ) -> Result<Box<dyn OperatorBuilder>, BuildError> {
        let factory = self.factories.get(&descriptor.operator_type).ok_or_else(|| {
            BuildError::new(
                descriptor.operator_id.clone(),
                BuildErrorKind::UnknownOperatorType {
                    tag: descriptor.operator_type.clone(),
                },
            )
        })?;
        Ok(factory(descriptor.resolver()))
    }

    /// Dispatch on the type tag and build. No side effects beyond the returned
    /// operator.
    pub fn build(
        &self,
        descriptor: &OperatorDescriptor,
        ctx: &BuildContext,
    ) -> Result<BuiltOperator, BuildError> {
        let built = self.builder_for(descriptor)?.build(ctx)?;
        tracing::debug!(
            operator_id = %descriptor.operator_id,
            operator_type = %descriptor.operator_type,
            "built operator"
        );
        Ok(built)
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::OperatorProperties;

    fn regex_descriptor() -> OperatorDescriptor {
        OperatorDescriptor::new(
            "m1",
            "RegexMatcher",
            OperatorProperties::new()
                .with("regex", "sal[a-z]+")
                .with("attributeNames", "bio")
                .with("attributeTypes", "text"),
        )
    }

    #[test]
    fn defaults_cover_every_operator_type() {
        let reg = OperatorRegistry::default();
        assert_eq!(
            reg.tags(),
            vec![
                "FileSink",
                "KeywordMatcher",
                "KeywordSource",
                "RegexMatcher",
                "ScanSource",
                "TupleSink"
            ]
        );
        assert!(OperatorRegistry::new().tags().is_empty());
    }

    #[test]
    fn unknown_tag_is_reported_with_operator_id() {
        let reg = OperatorRegistry::default();
        let d = OperatorDescriptor::new("x", "FooBar", OperatorProperties::new());
        let err = reg.build(&d, &BuildContext::default()).unwrap_err();
        assert_eq!(err.operator_id.as_str(), "x");
        assert_eq!(
            err.cause,
            BuildErrorKind::UnknownOperatorType {
                tag: "FooBar".into()
            }
        );
    }

    #[test]
    fn tags_are_case_sensitive() {
        let reg = OperatorRegistry::default();
        assert!(reg.contains("RegexMatcher"));
        assert!(!reg.contains("regexmatcher"));
    }

    #[test]
    fn building_twice_yields_equal_bindings() {
        let reg = OperatorRegistry::default();
        let ctx = BuildContext::default();
        let a = reg.build(&regex_descriptor(), &ctx).unwrap();
        let b = reg.build(&regex_descriptor(), &ctx).unwrap();
        let binding = a.binding().unwrap();
        assert_eq!(binding, b.binding().unwrap());
        assert_eq!(binding.key, "RegexMatcher");
        assert_eq!(binding.config["regex"], "sal[a-z]+");
    }

    #[test]
    fn custom_types_can_be_registered() {
        let mut reg = OperatorRegistry::new();
        reg.register("Scan", |p| Box::new(ScanSourceBuilder::new(p)));
        let d = OperatorDescriptor::new(
            "s",
            "Scan",
            OperatorProperties::new()
                .with("dataSource", "t")
                .with("attributeNames", "a")
                .with("attributeTypes", "text"),
        );
        let built = reg.build(&d, &BuildContext::default()).unwrap();
        assert_eq!(built.name(), "ScanSource");
        assert_eq!(built.input_arity(), 0);
    }
}
