use agora_types::api::{CreatePostRequest, UpdatePostRequest};
use agora_types::{DomainError, Post, PostId, UserId};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::error::{ApiError, run_blocking};
use crate::middleware::CurrentUser;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
    CurrentUser(who): CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.engine.allow_owner_scope(&who, owner_id)?;
    let db = state.db.clone();
    let post = run_blocking(move || {
        // Admins may address other users here, so the row must be checked.
        if db.find_user(owner_id)?.is_none() {
            return Err(DomainError::not_found("user not found"));
        }
        Ok(db.create_post(owner_id, &req.title, &req.body)?)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<Post>>, ApiError> {
    state.engine.allow_owner_scope(&who, owner_id)?;
    let db = state.db.clone();
    let posts = run_blocking(move || {
        if db.find_user(owner_id)?.is_none() {
            return Err(DomainError::not_found("user not found"));
        }
        Ok(db.list_posts(owner_id)?)
    })
    .await?;
    Ok(Json(posts))
}

pub async fn get(
    State(state): State<AppState>,
    Path((owner_id, post_id)): Path<(UserId, PostId)>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Post>, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    let post = run_blocking(move || {
        engine.allow_post(&who, owner_id, post_id)?;
        db.find_post(post_id)?
            .ok_or_else(|| DomainError::not_found("post not found"))
    })
    .await?;
    Ok(Json(post))
}

pub async fn update(
    State(state): State<AppState>,
    Path((owner_id, post_id)): Path<(UserId, PostId)>,
    CurrentUser(who): CurrentUser,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    let post = run_blocking(move || {
        engine.allow_post(&who, owner_id, post_id)?;
        db.update_post(post_id, &req.title, &req.body)?
            .ok_or_else(|| DomainError::not_found("post not found"))
    })
    .await?;
    Ok(Json(post))
}

pub async fn remove(
    State(state): State<AppState>,
    Path((owner_id, post_id)): Path<(UserId, PostId)>,
    CurrentUser(who): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    run_blocking(move || {
        engine.allow_post(&who, owner_id, post_id)?;
        if db.delete_post(post_id)? {
            Ok(())
        } else {
            Err(DomainError::not_found("post not found"))
        }
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
