//! Session token codec.
//!
//! Sessions are not persisted: a session is a signed, time-limited token
//! (JWT, HS256) held in a browser cookie. The embedded claims are a
//! convenience snapshot only - authorization always re-reads the live user
//! row, so the signature proves integrity but never grants a role by
//! itself (see [`crate::middleware::auth`]).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use stockroom_core::Role;

use crate::models::User;

/// Session lifetime in seconds: 7 days.
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: i64,
    /// Email at issue time (informational).
    pub email: String,
    /// Role at issue time (informational, never authoritative).
    pub role: Role,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Signs and verifies session tokens.
///
/// Constructed once from the configured signing secret and shared through
/// application state; there is no process-global key.
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionCodec {
    /// Create a codec from the signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // An expired token must read as absent immediately, without grace.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for `user`, expiring [`SESSION_TTL_SECONDS`] from now.
    ///
    /// # Errors
    ///
    /// Returns an error only if JWT serialization fails, which indicates a
    /// programming error rather than bad input.
    pub fn issue(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_expiring_at(user, Utc::now() + Duration::seconds(SESSION_TTL_SECONDS))
    }

    /// Issue a token for `user` with an explicit expiry.
    ///
    /// Used by `issue` and by tests that need already-expired tokens.
    ///
    /// # Errors
    ///
    /// Returns an error only if JWT serialization fails.
    pub fn issue_expiring_at(
        &self,
        user: &User,
        expires_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = SessionClaims {
            sub: user.id.as_i64(),
            email: user.email.as_str().to_owned(),
            role: user.role,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verify a token and return its claims.
    ///
    /// Returns `None` on a malformed token, a signature mismatch, or an
    /// expired timestamp. Absence of a valid session is a normal state, not
    /// an error, so this never surfaces a failure to the caller.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .ok()
            .map(|data| data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use stockroom_core::{Email, UserId};

    fn codec() -> SessionCodec {
        SessionCodec::new(&SecretString::from("0123456789abcdef0123456789abcdef"))
    }

    fn user() -> User {
        User {
            id: UserId::new(7),
            email: Email::parse("a@x.com").unwrap(),
            name: Some("Alex".to_owned()),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let codec = codec();
        let token = codec.issue(&user()).unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp - claims.iat >= SESSION_TTL_SECONDS - 1);
    }

    #[test]
    fn test_malformed_token_is_none() {
        assert!(codec().verify("not-a-token").is_none());
        assert!(codec().verify("").is_none());
    }

    #[test]
    fn test_tampered_token_is_none() {
        let codec = codec();
        let token = codec.issue(&user()).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(codec.verify(&tampered).is_none());
    }

    #[test]
    fn test_wrong_secret_is_none() {
        let token = codec().issue(&user()).unwrap();
        let other = SessionCodec::new(&SecretString::from("fedcba9876543210fedcba9876543210"));
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_expired_token_is_none() {
        let codec = codec();
        let token = codec
            .issue_expiring_at(&user(), Utc::now() - Duration::seconds(5))
            .unwrap();
        assert!(codec.verify(&token).is_none());
    }
}
