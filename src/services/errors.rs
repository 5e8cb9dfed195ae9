use thiserror::Error;

use crate::client::GENERIC_ERROR_MESSAGE;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No session, or the backend rejected the bearer token.
    #[error("unauthorized")]
    Unauthorized,

    /// Signed in, but the role does not allow the action.
    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error("{0}")]
    Backend(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Text for the flash message shown after a failed action.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Unauthorized => "Please sign in to continue.".to_string(),
            ServiceError::Forbidden => "You do not have permission to do that.".to_string(),
            ServiceError::NotFound => "The requested record was not found.".to_string(),
            ServiceError::Form(message) | ServiceError::Backend(message) => message.clone(),
            ServiceError::TypeConstraint(message) => format!("Invalid input: {message}"),
            ServiceError::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Unauthorized => ServiceError::Unauthorized,
            RepositoryError::Backend(message) => ServiceError::Backend(message),
            RepositoryError::ValidationError(message) => ServiceError::TypeConstraint(message),
            RepositoryError::Timeout(_) => ServiceError::Backend(
                "The server took too long to respond. Please try again.".to_string(),
            ),
            RepositoryError::ConnectionError(message) | RepositoryError::Unexpected(message) => {
                ServiceError::Internal(message)
            }
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_keep_their_meaning() {
        assert!(matches!(
            ServiceError::from(RepositoryError::Unauthorized),
            ServiceError::Unauthorized
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        let backend = ServiceError::from(RepositoryError::Backend("Term closed".to_string()));
        assert_eq!(backend.user_message(), "Term closed");
    }

    #[test]
    fn internal_details_are_not_shown_to_users() {
        let err = ServiceError::from(RepositoryError::ConnectionError(
            "dns error: backend.internal".to_string(),
        ));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
