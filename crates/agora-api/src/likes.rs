use agora_types::{DomainError, Like, LikeId, PostId, UserId};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::error::{ApiError, run_blocking};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Liking is open to any signed-in user, once per post. No request body; the
/// like belongs to the caller.
pub async fn create(
    State(state): State<AppState>,
    Path((owner_id, post_id)): Path<(UserId, PostId)>,
    CurrentUser(who): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let like = run_blocking(move || {
        let post = db
            .find_post(post_id)?
            .filter(|p| p.owner_id == owner_id)
            .ok_or_else(|| DomainError::not_found("post not found"))?;
        if db.find_like_by_owner(post.id, who.id)?.is_some() {
            return Err(DomainError::AlreadyExists("post is already liked".into()));
        }
        Ok(db.create_like(post.id, who.id)?)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(like)))
}

pub async fn list(
    State(state): State<AppState>,
    Path((owner_id, post_id)): Path<(UserId, PostId)>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<Like>>, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    let likes = run_blocking(move || {
        engine.allow_post(&who, owner_id, post_id)?;
        Ok::<_, DomainError>(db.list_likes(post_id)?)
    })
    .await?;
    Ok(Json(likes))
}

pub async fn get(
    State(state): State<AppState>,
    Path((owner_id, post_id, like_id)): Path<(UserId, PostId, LikeId)>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Like>, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    let like = run_blocking(move || {
        engine.allow_like_view(&who, owner_id, post_id, like_id)?;
        db.find_like(like_id)?
            .ok_or_else(|| DomainError::not_found("like not found"))
    })
    .await?;
    Ok(Json(like))
}

pub async fn remove(
    State(state): State<AppState>,
    Path((owner_id, post_id, like_id)): Path<(UserId, PostId, LikeId)>,
    CurrentUser(who): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    run_blocking(move || {
        engine.allow_like_mutation(&who, owner_id, post_id, like_id)?;
        if db.delete_like(like_id)? {
            Ok(())
        } else {
            Err(DomainError::not_found("like not found"))
        }
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
