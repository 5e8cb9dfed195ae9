use serde::Deserialize;
use validator::Validate;

use crate::domain::auth::LoginCredentials;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl TryFrom<LoginForm> for LoginCredentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        let email = form.email.trim().to_lowercase();
        if form.password.is_empty() {
            return Err(FormError::Missing("password"));
        }
        let form = LoginForm { email, ..form };
        form.validate().map_err(|_| FormError::InvalidEmail)?;

        Ok(Self {
            email: form.email,
            password: form.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        let credentials = LoginCredentials::try_from(LoginForm {
            email: "  Bursar@School.AC.KE ".to_string(),
            password: "hunter2".to_string(),
        })
        .unwrap();
        assert_eq!(credentials.email, "bursar@school.ac.ke");
    }

    #[test]
    fn missing_password_is_rejected() {
        let result = LoginCredentials::try_from(LoginForm {
            email: "bursar@school.ac.ke".to_string(),
            password: String::new(),
        });
        assert!(matches!(result, Err(FormError::Missing("password"))));
    }
}
