//! Authentication service.
//!
//! Password registration and login on top of the user repository. Password
//! hashing uses bcrypt with cost factor 10; the hash never travels past the
//! login comparison.

use sqlx::SqlitePool;
use thiserror::Error;

use stockroom_core::{Email, Role};

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair did not match. Covers both an unknown email and
    /// a wrong password so callers cannot enumerate accounts.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with the default MEMBER role.
    ///
    /// Callers are expected to have validated the input shape already
    /// (email format, password and name lengths).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        email: &Email,
        password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(email, Some(name), &password_hash, Role::Member)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Create a user with an explicit role (CLI provisioning path).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn provision(
        &self,
        email: &Email,
        password: &str,
        name: Option<&str>,
        role: Role,
    ) -> Result<User, AuthError> {
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(email, name, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email, an
    /// unparseable email, or a wrong password - identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches =
            bcrypt::verify(password, &password_hash).map_err(|_| AuthError::InvalidCredentials)?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}

/// Hash a password with bcrypt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| AuthError::PasswordHash(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[sqlx::test]
    async fn test_register_and_login(pool: SqlitePool) {
        let auth = AuthService::new(&pool);
        let user = auth
            .register(&email("a@x.com"), "secret1", "Alex")
            .await
            .unwrap();
        assert_eq!(user.role, Role::Member);
        assert_eq!(user.name.as_deref(), Some("Alex"));

        let logged_in = auth.login("a@x.com", "secret1").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[sqlx::test]
    async fn test_double_registration_is_taken(pool: SqlitePool) {
        let auth = AuthService::new(&pool);
        auth.register(&email("a@x.com"), "secret1", "Alex")
            .await
            .unwrap();

        let err = auth
            .register(&email("a@x.com"), "other99", "Sam")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[sqlx::test]
    async fn test_bad_credentials_are_indistinguishable(pool: SqlitePool) {
        let auth = AuthService::new(&pool);
        auth.register(&email("a@x.com"), "secret1", "Alex")
            .await
            .unwrap();

        let wrong_password = auth.login("a@x.com", "wrong!!").await.unwrap_err();
        let unknown_email = auth.login("ghost@x.com", "secret1").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[sqlx::test]
    async fn test_stored_hash_is_not_the_password(pool: SqlitePool) {
        let auth = AuthService::new(&pool);
        auth.register(&email("a@x.com"), "secret1", "Alex")
            .await
            .unwrap();

        let (_, hash) = UserRepository::new(&pool)
            .get_with_password_hash(&email("a@x.com"))
            .await
            .unwrap()
            .unwrap();
        assert_ne!(hash, "secret1");
        assert!(hash.starts_with("$2"));
    }

    #[sqlx::test]
    async fn test_provision_admin(pool: SqlitePool) {
        let auth = AuthService::new(&pool);
        let admin = auth
            .provision(&email("root@x.com"), "secret1", None, Role::Admin)
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(auth.login("root@x.com", "secret1").await.is_ok());
    }
}
