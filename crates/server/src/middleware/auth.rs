//! Authentication extractors.
//!
//! The auth gate is an explicit two-step composition: verify the token
//! signature, then re-resolve the user from the store. The role embedded in
//! the token is never trusted for authorization - a role change (or a
//! deleted account) takes effect on the very next request.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

use stockroom_core::UserId;

use crate::db::UserRepository;
use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;

use super::session::token_from_headers;

/// Resolve the current request's user, if any.
///
/// Returns `None` when the cookie is absent, the token is invalid or
/// expired, or the user row no longer exists. Read-only.
///
/// # Errors
///
/// Returns `ApiError::Internal` only when the user lookup itself fails.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<Option<User>, ApiError> {
    let Some(token) = token_from_headers(headers) else {
        return Ok(None);
    };

    let Some(claims) = state.codec().verify(token) else {
        return Ok(None);
    };

    // The lookup is authoritative; claims only tell us which row to read.
    let user = UserRepository::new(state.pool())
        .get_by_id(UserId::new(claims.sub))
        .await?;

    Ok(user)
}

/// Extractor that requires an authenticated user.
///
/// Rejects with 401 when no valid session resolves to a live user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("hello, {}", user.email)
/// }
/// ```
pub struct RequireUser(pub User);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let user = current_user(&state, &parts.headers).await?;
        user.map(Self).ok_or(ApiError::AuthRequired)
    }
}

/// Extractor that requires an authenticated admin.
///
/// Rejects with 401 when unauthenticated and 403 when the live role is not
/// ADMIN; the unauthenticated check always precedes the role check.
pub struct RequireAdmin(pub User);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(ApiError::Forbidden);
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally resolves the current user.
///
/// Unlike `RequireUser`, this never rejects on a missing session; lookup
/// failures still surface as 500.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let user = current_user(&state, &parts.headers).await?;
        Ok(Self(user))
    }
}
