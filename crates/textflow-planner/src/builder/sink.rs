//! Builders for terminal sinks.

use textflow_operators::sink::{FileSink, FileSinkConfig, TupleSink, TupleSinkConfig};

use crate::builder::{require_non_empty, BuildContext, BuiltOperator, OperatorBuilder};
use crate::error::BuildErrorKind;
use crate::pagination::find_pagination;
use crate::properties::{PropertyResolver, FILE_PATH};

/// `TupleSink`: optional `limit`/`offset` only.
#[derive(Debug, Clone)]
pub struct TupleSinkBuilder {
    props: PropertyResolver,
}

impl TupleSinkBuilder {
    pub fn new(props: PropertyResolver) -> Self {
        Self { props }
    }
}

impl OperatorBuilder for TupleSinkBuilder {
    fn properties(&self) -> &PropertyResolver {
        &self.props
    }

    fn try_build(&self, _ctx: &BuildContext) -> Result<BuiltOperator, BuildErrorKind> {
        let config = TupleSinkConfig {
            pagination: find_pagination(&self.props)?,
        };
        Ok(BuiltOperator::Sink(Box::new(TupleSink::new(config))))
    }
}

/// `FileSink`: `filePath`. The file is created when the sink is opened.
#[derive(Debug, Clone)]
pub struct FileSinkBuilder {
    props: PropertyResolver,
}

impl FileSinkBuilder {
    pub fn new(props: PropertyResolver) -> Self {
        Self { props }
    }
}

impl OperatorBuilder for FileSinkBuilder {
    fn properties(&self) -> &PropertyResolver {
        &self.props
    }

    fn try_build(&self, _ctx: &BuildContext) -> Result<BuiltOperator, BuildErrorKind> {
        let config = FileSinkConfig {
            file_path: require_non_empty(&self.props, FILE_PATH)?.trim().to_string(),
        };
        Ok(BuiltOperator::Sink(Box::new(FileSink::new(config))))
    }
}
