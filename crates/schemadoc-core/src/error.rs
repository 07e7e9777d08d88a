use thiserror::Error;

/// Core error type shared across schemadoc crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema source could not be resolved or read.
    #[error("schema load error: {0}")]
    SchemaLoad(String),
    /// The snapshot violates internal invariants.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Convenience alias for results returned by schemadoc crates.
pub type Result<T> = std::result::Result<T, Error>;
