//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Email, Role, UserId};

use super::validate::{FieldIssue, check_len_range};

/// Minimum password length for registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Registered-name length bounds.
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 80;

/// A registered user (domain type).
///
/// The password hash deliberately lives only in the database layer; nothing
/// above the repository ever holds it alongside a `User`.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: Option<String>,
    /// Role deciding create/delete eligibility.
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user, safe to return to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub email: Email,
    pub name: Option<String>,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterInput {
    /// Validate the registration fields.
    ///
    /// # Errors
    ///
    /// Returns one issue per offending field.
    pub fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        if let Err(e) = Email::parse(&self.email) {
            issues.push(FieldIssue::new("email", e.to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            issues.push(FieldIssue::new(
                "password",
                format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        check_len_range(&mut issues, "name", &self.name, NAME_MIN, NAME_MAX);

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(email: &str, password: &str, name: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_owned(),
            password: password.to_owned(),
            name: name.to_owned(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(input("a@x.com", "secret1", "Alex").validate().is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let issues = input("a@x.com", "five5", "Alex").validate().unwrap_err();
        assert!(issues.iter().any(|i| i.field == "password"));
    }

    #[test]
    fn test_bad_email_and_name_both_reported() {
        let issues = input("not-an-email", "secret1", "A").validate().unwrap_err();
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"name"));
    }

    #[test]
    fn test_name_bounds() {
        assert!(input("a@x.com", "secret1", "Al").validate().is_ok());
        assert!(input("a@x.com", "secret1", &"x".repeat(80)).validate().is_ok());
        assert!(input("a@x.com", "secret1", &"x".repeat(81)).validate().is_err());
    }

    #[test]
    fn test_public_user_has_no_hash_field() {
        // The projection type carries no password material at all; serialize
        // and check the raw JSON to be explicit about the contract.
        let user = User {
            id: UserId::new(1),
            email: Email::parse("a@x.com").unwrap(),
            name: Some("Alex".to_owned()),
            role: Role::Member,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(obj.contains_key("id"));
        assert!(obj.contains_key("email"));
        assert!(obj.contains_key("name"));
        assert!(obj.contains_key("role"));
    }
}
