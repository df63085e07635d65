//! Inventory route handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use stockroom_core::ItemId;

use crate::db::items::ItemRepository;
use crate::error::{ApiError, Result};
use crate::middleware::{RequireAdmin, RequireUser};
use crate::models::{CreateItemInput, UpdateItemInput};
use crate::state::AppState;

/// GET /items - every item, most recently updated first.
///
/// The list is global: all signed-in users see all items regardless of
/// who created them.
pub async fn list(RequireUser(_user): RequireUser, State(state): State<AppState>) -> Result<Response> {
    let items = ItemRepository::new(state.pool()).list().await?;

    Ok(Json(json!({ "items": items })).into_response())
}

/// POST /items - create an item, owned by the creating admin.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateItemInput>, JsonRejection>,
) -> Result<Response> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    input.validate().map_err(ApiError::Validation)?;

    let item = ItemRepository::new(state.pool())
        .create(admin.id, &input)
        .await?;

    tracing::info!(item_id = %item.id, owner_id = %admin.id, "item created");
    Ok((StatusCode::CREATED, Json(json!({ "item": item }))).into_response())
}

/// PATCH /items/{id} - partial update, open to any signed-in user.
///
/// Unknown ids are 404. Deliberately unscoped by owner or role; delete is
/// the only owner-gated mutation.
pub async fn update(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: std::result::Result<Json<UpdateItemInput>, JsonRejection>,
) -> Result<Response> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    input.validate().map_err(ApiError::Validation)?;

    let item = ItemRepository::new(state.pool())
        .update(ItemId::new(id), &input)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({ "item": item })).into_response())
}

/// DELETE /items/{id} - remove an own item (admin only).
///
/// Scoped to the caller's own items: an item owned by a different admin
/// reads as absent, so the failure is 404 rather than 403.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let deleted = ItemRepository::new(state.pool())
        .delete(ItemId::new(id), admin.id)
        .await?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    tracing::info!(item_id = id, owner_id = %admin.id, "item deleted");
    Ok(Json(json!({ "success": true })).into_response())
}
