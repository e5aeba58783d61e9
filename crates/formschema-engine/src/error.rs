use thiserror::Error;

/// Programmer mistakes in a schema or in the data it is paired with.
///
/// These never surface as validation errors. The accumulators log them and
/// degrade to "no value" / "no error" for the offending subtree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{schema} schema cannot walk a {found} value")]
    ShapeMismatch {
        schema: &'static str,
        found: &'static str,
    },

    #[error("key selector returned duplicate key {key:?}")]
    DuplicateKey { key: String },
}

pub type SchemaResult<T> = Result<T, SchemaError>;
