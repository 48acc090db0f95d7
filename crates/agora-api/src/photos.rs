use agora_types::api::CreatePhotoRequest;
use agora_types::{DomainError, Photo, PhotoId, PostId, UserId};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::error::{ApiError, run_blocking};
use crate::middleware::CurrentUser;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    Path((owner_id, post_id)): Path<(UserId, PostId)>,
    CurrentUser(who): CurrentUser,
    Json(req): Json<CreatePhotoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    let photo = run_blocking(move || {
        engine.allow_post(&who, owner_id, post_id)?;
        Ok::<_, DomainError>(db.create_photo(post_id, &req.file_name, &req.caption)?)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

pub async fn list(
    State(state): State<AppState>,
    Path((owner_id, post_id)): Path<(UserId, PostId)>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<Photo>>, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    let photos = run_blocking(move || {
        engine.allow_post(&who, owner_id, post_id)?;
        Ok::<_, DomainError>(db.list_photos(post_id)?)
    })
    .await?;
    Ok(Json(photos))
}

pub async fn get(
    State(state): State<AppState>,
    Path((owner_id, post_id, photo_id)): Path<(UserId, PostId, PhotoId)>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Photo>, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    let photo = run_blocking(move || {
        engine.allow_photo_view(&who, owner_id, post_id, photo_id)?;
        db.find_photo(photo_id)?
            .ok_or_else(|| DomainError::not_found("photo not found"))
    })
    .await?;
    Ok(Json(photo))
}

/// Deletion binds the caller by username to the post owner; see the engine
/// for the exact predicate.
pub async fn remove(
    State(state): State<AppState>,
    Path((owner_id, post_id, photo_id)): Path<(UserId, PostId, PhotoId)>,
    CurrentUser(who): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    run_blocking(move || {
        engine.allow_photo_delete(&who, owner_id, post_id, photo_id)?;
        if db.delete_photo(photo_id)? {
            Ok(())
        } else {
            Err(DomainError::not_found("photo not found"))
        }
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
