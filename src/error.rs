//! Error types for metastage
//!
//! Library errors use `thiserror`; the binary wraps them with `anyhow`.
//! Only validation errors escape the orchestrator; everything else is
//! folded into a failed `StagingResult`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for metastage operations
pub type StageResult<T> = Result<T, StageError>;

/// Main error type for metastage operations
#[derive(Error, Debug)]
pub enum StageError {
    /// Entity has neither `urn` nor `id`
    #[error("entity has no identifying key: supply either 'urn' or 'id'")]
    MissingIdentity,

    /// Entity has no display name (required for the properties aspect)
    #[error("entity '{entity}' has no 'name': the properties aspect requires one")]
    MissingName { entity: String },

    /// Malformed URN string
    #[error("invalid urn '{urn}': {message}")]
    InvalidUrn { urn: String, message: String },

    /// Malformed sub-field inside one facet
    #[error("invalid '{field}' value: {message}")]
    InvalidField { field: String, message: String },

    /// Entity descriptor file could not be parsed
    #[error("invalid entity file {file}: {message}")]
    InvalidEntityFile { file: PathBuf, message: String },

    /// Configuration file problem
    #[error("invalid config {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl StageError {
    /// True for pre-flight validation failures that must fail fast
    /// (CLI exit 1 before any file is touched).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StageError::MissingIdentity
                | StageError::MissingName { .. }
                | StageError::InvalidUrn { .. }
                | StageError::InvalidField { .. }
                | StageError::InvalidEntityFile { .. }
        )
    }
}
