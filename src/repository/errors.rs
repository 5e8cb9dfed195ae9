use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Session rejected by backend")]
    Unauthorized,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Backend timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
