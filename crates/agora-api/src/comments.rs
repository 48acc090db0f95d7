use agora_types::api::{CreateCommentRequest, UpdateCommentRequest};
use agora_types::{Comment, CommentId, DomainError, PostId, UserId};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::error::{ApiError, run_blocking};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Commenting is open to any signed-in user; the path still has to name a
/// real post under its real owner.
pub async fn create(
    State(state): State<AppState>,
    Path((owner_id, post_id)): Path<(UserId, PostId)>,
    CurrentUser(who): CurrentUser,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let comment = run_blocking(move || {
        let post = db
            .find_post(post_id)?
            .filter(|p| p.owner_id == owner_id)
            .ok_or_else(|| DomainError::not_found("post not found"))?;
        Ok::<_, DomainError>(db.create_comment(post.id, who.id, &req.body)?)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list(
    State(state): State<AppState>,
    Path((owner_id, post_id)): Path<(UserId, PostId)>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    let comments = run_blocking(move || {
        engine.allow_post(&who, owner_id, post_id)?;
        Ok::<_, DomainError>(db.list_comments(post_id)?)
    })
    .await?;
    Ok(Json(comments))
}

pub async fn get(
    State(state): State<AppState>,
    Path((owner_id, post_id, comment_id)): Path<(UserId, PostId, CommentId)>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Comment>, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    let comment = run_blocking(move || {
        engine.allow_comment_view(&who, owner_id, post_id, comment_id)?;
        db.find_comment(comment_id)?
            .ok_or_else(|| DomainError::not_found("comment not found"))
    })
    .await?;
    Ok(Json(comment))
}

pub async fn update(
    State(state): State<AppState>,
    Path((owner_id, post_id, comment_id)): Path<(UserId, PostId, CommentId)>,
    CurrentUser(who): CurrentUser,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    let comment = run_blocking(move || {
        engine.allow_comment_mutation(&who, owner_id, post_id, comment_id)?;
        db.update_comment(comment_id, &req.body)?
            .ok_or_else(|| DomainError::not_found("comment not found"))
    })
    .await?;
    Ok(Json(comment))
}

pub async fn remove(
    State(state): State<AppState>,
    Path((owner_id, post_id, comment_id)): Path<(UserId, PostId, CommentId)>,
    CurrentUser(who): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let db = state.db.clone();
    run_blocking(move || {
        engine.allow_comment_mutation(&who, owner_id, post_id, comment_id)?;
        if db.delete_comment(comment_id)? {
            Ok(())
        } else {
            Err(DomainError::not_found("comment not found"))
        }
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
