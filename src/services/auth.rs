//! Sign-in and sign-out against the backend auth endpoints.

use crate::domain::auth::{AuthenticatedUser, LoginCredentials};
use crate::forms::auth::LoginForm;
use crate::repository::AuthGateway;
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Exchanges the credentials for a backend session.
pub async fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<AuthenticatedUser>
where
    R: AuthGateway + ?Sized,
{
    let credentials = LoginCredentials::try_from(form)?;

    let session = repo.login(&credentials).await.map_err(|err| match err {
        RepositoryError::Unauthorized => ServiceError::Form(INVALID_CREDENTIALS.to_string()),
        err => {
            log::error!("Failed to sign in {}: {err}", credentials.email);
            ServiceError::from(err)
        }
    })?;

    if session.token.trim().is_empty() {
        log::error!("Backend returned an empty token for {}", credentials.email);
        return Err(ServiceError::Internal("empty session token".to_string()));
    }

    log::info!("User {} signed in", session.user.email);
    Ok(AuthenticatedUser::from_session(session))
}

/// Revokes the backend token. The local session is cleared regardless.
pub async fn logout<R>(repo: &R, user: &AuthenticatedUser)
where
    R: AuthGateway + ?Sized,
{
    if let Err(err) = repo.logout().await {
        log::warn!("Backend logout failed for {}: {err}", user.email);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{LoginSession, UserProfile};
    use crate::domain::types::UserId;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::admin_user;

    fn form() -> LoginForm {
        LoginForm {
            email: "Bursar@school.ac.ke".to_string(),
            password: "secret".to_string(),
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::new(5).unwrap(),
            email: "bursar@school.ac.ke".to_string(),
            name: "Bursar".to_string(),
            roles: vec!["accountant".to_string()],
            school_name: None,
            branch_id: None,
        }
    }

    #[actix_web::test]
    async fn successful_login_keeps_token_and_roles() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .withf(|c| c.email == "bursar@school.ac.ke" && c.password == "secret")
            .times(1)
            .returning(|_| {
                Ok(LoginSession {
                    token: "abc".to_string(),
                    user: profile(),
                })
            });

        let user = login(&repo, form()).await.unwrap();

        assert_eq!(user.token, "abc");
        assert_eq!(user.roles, vec!["accountant".to_string()]);
    }

    #[actix_web::test]
    async fn rejected_credentials_become_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .returning(|_| Err(RepositoryError::Unauthorized));

        let result = login(&repo, form()).await;

        assert!(matches!(result, Err(ServiceError::Form(m)) if m == INVALID_CREDENTIALS));
    }

    #[actix_web::test]
    async fn invalid_email_never_reaches_backend() {
        let mut repo = MockRepository::new();
        repo.expect_login().times(0);

        let result = login(
            &repo,
            LoginForm {
                email: "nope".to_string(),
                password: "secret".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn logout_swallows_backend_errors() {
        let mut repo = MockRepository::new();
        repo.expect_logout()
            .times(1)
            .returning(|| Err(RepositoryError::Timeout("slow".to_string())));

        logout(&repo, &admin_user()).await;
    }
}
