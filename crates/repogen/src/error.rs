//! Error types for the generation library.

use thiserror::Error;

/// Main error type for generation operations.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Configuration error (missing fields, unresolvable templates, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (reading configuration or schema files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;
