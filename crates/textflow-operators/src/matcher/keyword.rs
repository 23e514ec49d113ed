//! Keyword matching with a selectable strategy.
//!
//! Tokens are lowercase alphanumeric runs. `string` attributes are matched as
//! whole values; `text` attributes are tokenized.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use textflow_core::prelude::{FieldType, FieldValue, Schema, Tuple};

use crate::pagination::{Pagination, Paginator};
use crate::traits::{resolve_targets, single_input, OpError, Operator, OperatorBinding, Upstream};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordMatchingType {
    /// Keyword tokens appear contiguously, in order.
    #[serde(rename = "PHRASE")]
    Phrase,
    /// Every keyword token appears somewhere in the field.
    #[serde(rename = "CONJUNCTION_INDEXBASED")]
    Conjunction,
    /// Phrase semantics; storage may answer it from a positional index.
    #[serde(rename = "PHRASE_INDEXBASED")]
    PhraseIndexBased,
    /// Case-sensitive substring of the raw field value.
    #[serde(rename = "SUBSTRING_SCANBASED")]
    Substring,
}

impl KeywordMatchingType {
    pub const ALL: [KeywordMatchingType; 4] = [
        KeywordMatchingType::Phrase,
        KeywordMatchingType::Conjunction,
        KeywordMatchingType::PhraseIndexBased,
        KeywordMatchingType::Substring,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            KeywordMatchingType::Phrase => "PHRASE",
            KeywordMatchingType::Conjunction => "CONJUNCTION_INDEXBASED",
            KeywordMatchingType::PhraseIndexBased => "PHRASE_INDEXBASED",
            KeywordMatchingType::Substring => "SUBSTRING_SCANBASED",
        }
    }
}

impl fmt::Display for KeywordMatchingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown matching type '{0}' (expected one of PHRASE, CONJUNCTION_INDEXBASED, PHRASE_INDEXBASED, SUBSTRING_SCANBASED)")]
pub struct UnknownMatchingType(pub String);

impl FromStr for KeywordMatchingType {
    type Err = UnknownMatchingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        KeywordMatchingType::ALL
            .into_iter()
            .find(|t| t.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMatchingType(s.to_string()))
    }
}

pub fn tokenize(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Compiled keyword test over a fixed set of attribute positions.
#[derive(Debug, Clone)]
pub struct KeywordPredicate {
    keyword: String,
    tokens: Vec<String>,
    matching_type: KeywordMatchingType,
    targets: Vec<(usize, FieldType)>,
}

impl KeywordPredicate {
    pub fn new(
        keyword: &str,
        matching_type: KeywordMatchingType,
        targets: Vec<(usize, FieldType)>,
    ) -> Self {
        Self {
            keyword: keyword.to_string(),
            tokens: tokenize(keyword),
            matching_type,
            targets,
        }
    }

    /// Reject keywords that cannot match anything under `matching_type`.
    pub fn validate_keyword(keyword: &str, matching_type: KeywordMatchingType) -> Result<(), String> {
        if keyword.trim().is_empty() {
            return Err("keyword must not be empty".into());
        }
        if matching_type != KeywordMatchingType::Substring && tokenize(keyword).is_empty() {
            return Err(format!(
                "keyword '{keyword}' has no alphanumeric tokens for {matching_type} matching"
            ));
        }
        Ok(())
    }

    pub fn matches(&self, tuple: &Tuple) -> bool {
        self.targets.iter().any(|(idx, ty)| {
            tuple
                .field(*idx)
                .and_then(FieldValue::as_str)
                .is_some_and(|v| self.matches_value(v, *ty))
        })
    }

    fn matches_value(&self, value: &str, ty: FieldType) -> bool {
        use KeywordMatchingType::*;
        match (self.matching_type, ty) {
            (Substring, _) => value.contains(self.keyword.as_str()),
            (_, FieldType::String) => value == self.keyword,
            (Conjunction, _) => {
                let present: HashSet<String> = tokenize(value).into_iter().collect();
                self.tokens.iter().all(|t| present.contains(t))
            }
            (Phrase | PhraseIndexBased, _) => {
                let tokens = tokenize(value);
                !self.tokens.is_empty()
                    && tokens
                        .windows(self.tokens.len())
                        .any(|w| w == self.tokens.as_slice())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatcherConfig {
    pub keyword: String,
    pub matching_type: KeywordMatchingType,
    /// Attributes to search; each must exist in the input with the same type.
    pub attributes: Schema,
    #[serde(default)]
    pub pagination: Pagination,
}

pub struct KeywordMatcher {
    config: KeywordMatcherConfig,
    input: Upstream,
    predicate: Option<KeywordPredicate>,
    paginator: Paginator,
}

impl KeywordMatcher {
    pub const KEY: &'static str = "KeywordMatcher";

    pub fn new(config: KeywordMatcherConfig) -> Self {
        let paginator = Paginator::new(config.pagination);
        Self {
            config,
            input: Upstream::default(),
            predicate: None,
            paginator,
        }
    }

    pub fn config(&self) -> &KeywordMatcherConfig {
        &self.config
    }
}

impl Operator for KeywordMatcher {
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
        let positions = resolve_targets(&self.config.attributes, input_schema)?;
        let targets = positions
            .into_iter()
            .zip(self.config.attributes.iter().map(|a| a.field_type))
            .collect();
        self.input.attach(Self::KEY, input)?;
        self.predicate = Some(KeywordPredicate::new(
            &self.config.keyword,
            self.config.matching_type,
            targets,
        ));
        Ok(())
    }

    fn open(&mut self) -> Result<(), OpError> {
        self.input.open(Self::KEY)?;
        self.paginator.reset();
        Ok(())
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>, OpError> {
        let predicate = self
            .predicate
            .as_ref()
            .ok_or_else(|| OpError::State(format!("{} has no input", Self::KEY)))?;
        while !self.paginator.exhausted() {
            let Some(tuple) = self.input.next(Self::KEY)? else {
                break;
            };
            if predicate.matches(&tuple) && self.paginator.admit() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::scan::tests::{drain, people_schema, scan};
    use textflow_core::prelude::Attribute;

    fn matcher(keyword: &str, ty: KeywordMatchingType, pagination: Pagination) -> KeywordMatcher {
        let mut m = KeywordMatcher::new(KeywordMatcherConfig {
            keyword: keyword.into(),
            matching_type: ty,
            attributes: Schema::try_new(vec![Attribute::new("bio", FieldType::Text)]).unwrap(),
            pagination,
        });
        m.set_input(Box::new(scan(Pagination::default())), &people_schema())
            .unwrap();
        m
    }

    fn names(rows: &[Tuple]) -> Vec<String> {
        rows.iter()
            .filter_map(|t| t.field(0).and_then(FieldValue::as_str).map(str::to_string))
            .collect()
    }

    #[test]
    fn parses_tags_case_insensitively() {
        assert_eq!(
            "phrase_indexbased".parse::<KeywordMatchingType>().unwrap(),
            KeywordMatchingType::PhraseIndexBased
        );
        assert_eq!(
            " SUBSTRING_SCANBASED ".parse::<KeywordMatchingType>().unwrap(),
            KeywordMatchingType::Substring
        );
        assert!("FUZZY".parse::<KeywordMatchingType>().is_err());
    }

    #[test]
    fn phrase_requires_contiguous_tokens() {
        let mut m = matcher("Lin Clooney", KeywordMatchingType::Phrase, Pagination::default());
        assert_eq!(names(&drain(&mut m)), vec!["brad", "george"]);

        let mut m = matcher("clooney lin", KeywordMatchingType::Phrase, Pagination::default());
        assert!(drain(&mut m).is_empty());
    }

    #[test]
    fn conjunction_ignores_order() {
        let mut m = matcher("tall lin", KeywordMatchingType::Conjunction, Pagination::default());
        assert_eq!(names(&drain(&mut m)), vec!["brad"]);
    }

    #[test]
    fn index_phrase_has_phrase_semantics() {
        let mut m = matcher(
            "is short",
            KeywordMatchingType::PhraseIndexBased,
            Pagination::default(),
        );
        assert_eq!(names(&drain(&mut m)), vec!["george"]);
    }

    #[test]
    fn substring_is_case_sensitive() {
        let mut m = matcher("ort", KeywordMatchingType::Substring, Pagination::default());
        assert_eq!(names(&drain(&mut m)), vec!["tom", "george"]);
        let mut m = matcher("ORT", KeywordMatchingType::Substring, Pagination::default());
        assert!(drain(&mut m).is_empty());
    }

    #[test]
    fn pagination_bounds_matches() {
        let mut m = matcher("lin", KeywordMatchingType::Conjunction, Pagination::new(Some(1), Some(1)));
        assert_eq!(names(&drain(&mut m)), vec!["brad"]);
    }

    #[test]
    fn string_attributes_match_whole_values() {
        let p = KeywordPredicate::new("tom", KeywordMatchingType::Phrase, vec![(0, FieldType::String)]);
        let row = |s: &str| Tuple::new(vec![FieldValue::String(s.into())]);
        assert!(p.matches(&row("tom")));
        assert!(!p.matches(&row("tom hanks")));
    }

    #[test]
    fn keyword_validation() {
        assert!(KeywordPredicate::validate_keyword("  ", KeywordMatchingType::Substring).is_err());
        assert!(KeywordPredicate::validate_keyword("--", KeywordMatchingType::Phrase).is_err());
        assert!(KeywordPredicate::validate_keyword("--", KeywordMatchingType::Substring).is_ok());
        assert!(KeywordPredicate::validate_keyword("x", KeywordMatchingType::Conjunction).is_ok());
    }

    #[test]
    fn plan_rejects_unknown_target() {
        let m = KeywordMatcher::new(KeywordMatcherConfig {
            keyword: "x".into(),
            matching_type: KeywordMatchingType::Phrase,
            attributes: Schema::try_new(vec![Attribute::new("title", FieldType::Text)]).unwrap(),
            pagination: Pagination::default(),
        });
        assert!(matches!(
            m.plan(&[people_schema()]),
            Err(OpError::UnresolvedAttribute { .. })
        ));
    }

    #[test]
    fn open_without_input_fails() {
        let mut m = KeywordMatcher::new(KeywordMatcherConfig {
            keyword: "x".into(),
            matching_type: KeywordMatchingType::Phrase,
            attributes: Schema::empty(),
            pagination: Pagination::default(),
        });
        assert!(matches!(m.open(), Err(OpError::State(_))));
    }
}
