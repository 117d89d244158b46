//! Error types for the mapping crate.

// Re-export the core error type
pub use csa_core::error::Error as CsaError;

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Namespace error: {0}")]
    Namespace(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;

impl From<toml::de::Error> for MappingError {
    fn from(e: toml::de::Error) -> Self {
        MappingError::Parse(e.to_string())
    }
}

// Convert MappingError to CsaError
impl From<MappingError> for CsaError {
    fn from(e: MappingError) -> Self {
        match e {
            MappingError::Parse(s) => CsaError::Parse {
                location: "mapping".to_string(),
                message: s,
            },
            MappingError::Validation(s) => CsaError::Config(s),
            MappingError::Namespace(s) => CsaError::Internal(s),
            MappingError::Io(e) => CsaError::Io(e.to_string()),
        }
    }
}
