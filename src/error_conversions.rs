//! Error conversion glue between layers.
//!
//! The domain layer must not depend on client, repository or service error
//! types, so the `From` impls that let `?` flow upward live here.

use reqwest::StatusCode;

use crate::client::ApiError;
use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<ApiError> for RepositoryError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => RepositoryError::Unauthorized,
            ApiError::Backend { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
                RepositoryError::NotFound
            }
            ApiError::Backend { message, .. } => RepositoryError::Backend(message),
            ApiError::Timeout(message) => RepositoryError::Timeout(message),
            ApiError::Transport(message) => RepositoryError::ConnectionError(message),
            ApiError::Decode(message) | ApiError::InvalidPath(message) => {
                RepositoryError::Unexpected(message)
            }
        }
    }
}
