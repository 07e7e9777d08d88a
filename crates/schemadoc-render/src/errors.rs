use thiserror::Error;

/// Errors raised while validating configuration or rendering a tag.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Global settings are malformed; fatal at startup.
    #[error("invalid configuration: {0}")]
    ConfigValidation(String),
    /// A tag override names an option that does not exist.
    #[error("unknown option '{key}'")]
    UnknownOption { key: String },
    /// A tag override value cannot be coerced to the option's type.
    #[error("invalid value '{value}' for option '{key}': expected {expected}")]
    TypeCoercion {
        key: String,
        expected: String,
        value: String,
    },
    #[error(transparent)]
    Schema(#[from] schemadoc_core::Error),
    #[error("table '{0}' not found in schema")]
    TableNotFound(String),
    #[error("unsupported sql dialect '{0}'")]
    UnsupportedDialect(String),
    /// The tag text could not be parsed into arguments.
    #[error("invalid tag syntax: {0}")]
    TagSyntax(String),
}

impl RenderError {
    pub(crate) fn coercion(
        key: impl Into<String>,
        expected: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        RenderError::TypeCoercion {
            key: key.into(),
            expected: expected.into(),
            value: value.to_string(),
        }
    }
}

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;
