use crate::validation::ValidationReport;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FintrackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Import rejected: {0}")]
    Import(#[from] ImportError),

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid record: {}", .0.messages().join("; "))]
    Invalid(ValidationReport),

    #[error("Seed unavailable: {0}")]
    Seed(String),
}

/// Reasons an import document is turned away before anything is stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("JSON must be an array")]
    NotAnArray,

    #[error("invalid record structure at position {index}")]
    InvalidStructure { index: usize },

    #[error("record at position {index} failed validation: {}", errors.join("; "))]
    FailedValidation { index: usize, errors: Vec<String> },
}

pub type Result<T> = std::result::Result<T, FintrackError>;
