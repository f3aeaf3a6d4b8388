// panorama-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanoramaError {
    // --- DOMAIN ERRORS (gate rules) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, store) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for PanoramaError {
    fn from(err: std::io::Error) -> Self {
        PanoramaError::Infrastructure(InfrastructureError::Io(err))
    }
}
