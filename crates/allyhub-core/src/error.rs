//! Error taxonomy for core operations.
//!
//! Every failure a caller can observe maps to one [`CoreError`] variant.
//! Authentication failures all collapse into `InvalidCredentials` so a caller
//! cannot learn which half of a credential pair was wrong. Storage faults are
//! logged here and surfaced without their details.

use thiserror::Error;

use crate::repository::RepoError;

/// Errors returned by core services
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or malformed input
    #[error("validation error: {0}")]
    Validation(String),

    /// The addressed user, pool, session or token does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Duplicate of a unique value (e.g. email)
    #[error("{0}")]
    Conflict(String),

    /// Bad password, unknown/expired session, or inactive/mismatched token
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Underlying persistence fault; details stay in the logs
    #[error("storage failure")]
    Storage(#[source] anyhow::Error),

    /// Password hashing or secret generation failed
    #[error("credential processing failed")]
    Credential(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }
}

impl From<RepoError> for CoreError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(entity) => CoreError::NotFound(entity),
            RepoError::Conflict(msg) => CoreError::Conflict(msg),
            RepoError::Backend(source) => {
                tracing::error!(error = %source, "Storage operation failed");
                CoreError::Storage(source)
            }
        }
    }
}

/// Result type for core service operations
pub type CoreResult<T> = Result<T, CoreError>;
