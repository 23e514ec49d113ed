use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown field type '{0}'")]
    UnknownFieldType(String),

    #[error(transparent)]
    DuplicateAttribute(#[from] crate::schema::DuplicateAttribute),

    #[error("value does not fit field type {expected}: {value}")]
    TypeMismatch { expected: String, value: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Hashing error: {0}")]
    Hash(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
