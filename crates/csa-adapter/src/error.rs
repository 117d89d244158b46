//! Error types for the adapter crate.

use thiserror::Error;

pub use csa_core::error::Error as CsaError;
use csa_mapping::MappingError;

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// The mapping document or the namespace root could not be set up.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The process-variable source failed.
    #[error("Variable source error: {0}")]
    Source(#[from] CsaError),
}

impl From<AdapterError> for CsaError {
    fn from(e: AdapterError) -> Self {
        match e {
            AdapterError::Mapping(e) => e.into(),
            AdapterError::Source(e) => e,
        }
    }
}
