//! Signed-in user and the credentials exchanged with the backend.

use serde::{Deserialize, Serialize};

use crate::domain::types::{BranchId, UserId};

/// Profile of the signed-in account as returned by `/auth/me`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Successful login answer.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginSession {
    pub token: String,
    pub user: UserProfile,
}

/// User stored in the session cookie for the duration of a login.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub school_name: Option<String>,
    pub branch_id: Option<BranchId>,
    /// Bearer token forwarded on every backend call. Never rendered.
    #[serde(default)]
    pub token: String,
}

impl AuthenticatedUser {
    pub fn from_session(session: LoginSession) -> Self {
        let LoginSession { token, user } = session;
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            roles: user.roles,
            school_name: user.school_name,
            branch_id: user.branch_id,
            token,
        }
    }

    /// Copy safe to hand to templates.
    pub fn public(&self) -> Self {
        Self {
            token: String::new(),
            ..self.clone()
        }
    }
}

/// Case-insensitive role membership check.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r.trim().eq_ignore_ascii_case(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_compare_case_insensitively() {
        let roles = vec!["ADMIN".to_string(), " Accountant ".to_string()];
        assert!(check_role("admin", &roles));
        assert!(check_role("accountant", &roles));
        assert!(!check_role("teacher", &roles));
    }

    #[test]
    fn public_copy_drops_the_token() {
        let user = AuthenticatedUser {
            id: UserId::new(1).unwrap(),
            email: "bursar@example.com".to_string(),
            name: "Bursar".to_string(),
            roles: vec![],
            school_name: None,
            branch_id: None,
            token: "secret".to_string(),
        };
        assert!(user.public().token.is_empty());
        assert_eq!(user.public().email, user.email);
    }
}
