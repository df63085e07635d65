//! Auth route handlers: register, login, logout, me.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use stockroom_core::Email;

use crate::error::{ApiError, Result};
use crate::middleware::{OptionalUser, clear_session_cookie, session_cookie};
use crate::models::{LoginInput, PublicUser, RegisterInput, User};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Issue a session for `user` and build a response carrying the cookie.
fn session_response(state: &AppState, user: &User, status: StatusCode) -> Result<Response> {
    let token = state
        .codec()
        .issue(user)
        .map_err(|e| ApiError::Internal(format!("failed to sign session token: {e}")))?;
    let cookie = session_cookie(&token, state.config().cookies_secure());

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "user": PublicUser::from(user) })),
    )
        .into_response())
}

/// POST /auth/register - create an account and start a session.
pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<RegisterInput>, JsonRejection>,
) -> Result<Response> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    input.validate().map_err(ApiError::Validation)?;

    // validate() already checked the email shape; parse cannot fail here.
    let email = Email::parse(&input.email)
        .map_err(|e| ApiError::Internal(format!("email re-parse failed: {e}")))?;

    let auth = AuthService::new(state.pool());
    let user = auth.register(&email, &input.password, &input.name).await?;

    tracing::info!(user_id = %user.id, "user registered");
    session_response(&state, &user, StatusCode::CREATED)
}

/// POST /auth/login - verify credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginInput>, JsonRejection>,
) -> Result<Response> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let auth = AuthService::new(state.pool());
    let user = auth.login(&input.email, &input.password).await?;

    tracing::info!(user_id = %user.id, "user logged in");
    session_response(&state, &user, StatusCode::OK)
}

/// POST /auth/logout - discard the session cookie.
///
/// Idempotent: succeeds whether or not a valid session was presented.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = clear_session_cookie(state.config().cookies_secure());

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// GET /auth/me - the current user, or null when signed out.
///
/// Never fails: an absent, expired, or stale session reads as signed out.
pub async fn me(OptionalUser(user): OptionalUser) -> Json<serde_json::Value> {
    Json(json!({ "user": user.as_ref().map(PublicUser::from) }))
}
