//! Keyword search fused with a data-set scan.
//!
//! Searches every textual attribute of the declared schema, so no upstream
//! matcher is needed for the common "find documents containing X" plan.

use serde::{Deserialize, Serialize};

use textflow_core::prelude::{Schema, Tuple};

use crate::catalog::MemoryCatalog;
use crate::matcher::{KeywordMatchingType, KeywordPredicate};
use crate::pagination::{Pagination, Paginator};
use crate::source::scan::{ScanSource, ScanSourceConfig};
use crate::traits::{OpError, Operator, OperatorBinding};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSourceConfig {
    pub data_source: String,
    pub schema: Schema,
    pub keyword: String,
    pub matching_type: KeywordMatchingType,
    #[serde(default)]
    pub pagination: Pagination,
}

pub struct KeywordSource {
    config: KeywordSourceConfig,
    scan: ScanSource,
    predicate: KeywordPredicate,
    paginator: Paginator,
}

impl KeywordSource {
    pub const KEY: &'static str = "KeywordSource";

    /// Fails when the declared schema has no `string`/`text` attribute.
    pub fn new(config: KeywordSourceConfig, catalog: MemoryCatalog) -> Result<Self, OpError> {
        let targets: Vec<_> = config
            .schema
            .iter()
            .enumerate()
            .filter(|(_, a)| a.field_type.is_textual())
            .map(|(i, a)| (i, a.field_type))
            .collect();
        if targets.is_empty() {
            return Err(OpError::Plan(format!(
                "{} needs at least one string or text attribute in {}",
                Self::KEY,
                config.schema
            )));
        }
        let predicate = KeywordPredicate::new(&config.keyword, config.matching_type, targets);
        let scan = ScanSource::new(
            ScanSourceConfig {
                data_source: config.data_source.clone(),
                schema: config.schema.clone(),
                pagination: Pagination::default(),
            },
            catalog,
        );
        let paginator = Paginator::new(config.pagination);
        Ok(Self {
            config,
            scan,
            predicate,
            paginator,
        })
    }

    pub fn config(&self) -> &KeywordSourceConfig {
        &self.config
    }
}

impl Operator for KeywordSource {
    fn name(&self) -> &'static str {
        Self::KEY
    }

    fn input_arity(&self) -> usize {
        0
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        if !input_schemas.is_empty() {
            return Err(OpError::Plan(format!("{} takes no input", Self::KEY)));
        }
        Ok(self.config.schema.clone())
    }

    fn set_input(&mut self, _input: Box<dyn Operator>, _schema: &Schema) -> Result<(), OpError> {
        Err(OpError::Plan(format!("{} takes no input", Self::KEY)))
    }

    fn open(&mut self) -> Result<(), OpError> {
        self.scan.open()?;
        self.paginator.reset();
        Ok(())
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>, OpError> {
        while !self.paginator.exhausted() {
            let Some(tuple) = self.scan.next_row()? else {
                break;
            };
            if self.predicate.matches(&tuple) && self.paginator.admit() {
                return Ok(Some(tuple));
            }
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<(), OpError> {
        self.scan.close()
    }

    fn binding(&self) -> Result<OperatorBinding, OpError> {
        OperatorBinding::new(Self::KEY, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::scan::tests::{drain, people_catalog, people_schema};
    use textflow_core::prelude::{Attribute, FieldType, FieldValue};

    fn source(keyword: &str, ty: KeywordMatchingType, pagination: Pagination) -> KeywordSource {
        KeywordSource::new(
            KeywordSourceConfig {
                data_source: "people".into(),
                schema: people_schema(),
                keyword: keyword.into(),
                matching_type: ty,
                pagination,
            },
            people_catalog(),
        )
        .unwrap()
    }

    #[test]
    fn searches_every_textual_attribute() {
        // "tom" hits the string attribute, "angry" the text attribute.
        let mut src = source("tom", KeywordMatchingType::Phrase, Pagination::default());
        assert_eq!(drain(&mut src).len(), 1);
        let mut src = source("angry", KeywordMatchingType::Conjunction, Pagination::default());
        let rows = drain(&mut src);
        assert_eq!(rows[0].field(0), Some(&FieldValue::String("bruce".into())));
    }

    #[test]
    fn paginates_matches() {
        let mut src = source("lin", KeywordMatchingType::Conjunction, Pagination::new(None, Some(2)));
        let rows = drain(&mut src);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field(0), Some(&FieldValue::String("george".into())));
    }

    #[test]
    fn requires_a_textual_attribute() {
        let err = KeywordSource::new(
            KeywordSourceConfig {
                data_source: "people".into(),
                schema: Schema::try_new(vec![Attribute::new("age", FieldType::Integer)]).unwrap(),
                keyword: "x".into(),
                matching_type: KeywordMatchingType::Phrase,
                pagination: Pagination::default(),
            },
            people_catalog(),
        );
        assert!(matches!(err, Err(OpError::Plan(_))));
    }
}
