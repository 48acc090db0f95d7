use agora_types::api::{UpdateUserByEmailRequest, UpdateUserByUsernameRequest, UpdateUserRequest};
use agora_types::{DomainError, User, UserId};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::info;

use crate::error::{ApiError, run_blocking};
use crate::middleware::CurrentUser;
use crate::state::AppState;

pub async fn get(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<User>, ApiError> {
    state.engine.allow_user(&who, owner_id)?;
    let db = state.db.clone();
    let user = run_blocking(move || {
        db.find_user(owner_id)?
            .ok_or_else(|| DomainError::not_found("user not found"))
    })
    .await?;
    Ok(Json(user))
}

pub async fn update(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
    CurrentUser(who): CurrentUser,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    state.engine.allow_user(&who, owner_id)?;
    let db = state.db.clone();
    let user = run_blocking(move || {
        if db
            .find_user_by_username(&req.username)?
            .is_some_and(|u| u.id != owner_id)
        {
            return Err(DomainError::Conflict("username is already taken".into()));
        }
        if db
            .find_user_by_email(&req.email)?
            .is_some_and(|u| u.id != owner_id)
        {
            return Err(DomainError::Conflict("email is already registered".into()));
        }
        db.update_user(owner_id, &req.username, &req.email)?
            .ok_or_else(|| DomainError::not_found("user not found"))
    })
    .await?;
    Ok(Json(user))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
    CurrentUser(who): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    state.engine.allow_user(&who, owner_id)?;
    let db = state.db.clone();
    run_blocking(move || {
        if db.delete_user(owner_id)? {
            Ok(())
        } else {
            Err(DomainError::not_found("user not found"))
        }
    })
    .await?;
    info!("deleted user {}", owner_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Changes the email of the user named in the path. The body must repeat the
/// path username; the guard enforces both that echo and the caller's claim to
/// the name.
pub async fn update_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
    CurrentUser(who): CurrentUser,
    Json(req): Json<UpdateUserByUsernameRequest>,
) -> Result<Json<User>, ApiError> {
    state
        .engine
        .allow_user_by_username(&who, &username, &req.username)?;
    let db = state.db.clone();
    let user = run_blocking(move || {
        if db
            .find_user_by_email(&req.email)?
            .is_some_and(|u| u.username != username)
        {
            return Err(DomainError::Conflict("email is already registered".into()));
        }
        db.update_email_by_username(&username, &req.email)?
            .ok_or_else(|| DomainError::not_found("user not found"))
    })
    .await?;
    Ok(Json(user))
}

/// Mirror of [`update_by_username`]: addressed by email, changes the username.
pub async fn update_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
    CurrentUser(who): CurrentUser,
    Json(req): Json<UpdateUserByEmailRequest>,
) -> Result<Json<User>, ApiError> {
    state.engine.allow_user_by_email(&who, &email, &req.email)?;
    let db = state.db.clone();
    let user = run_blocking(move || {
        if db
            .find_user_by_username(&req.username)?
            .is_some_and(|u| u.email != email)
        {
            return Err(DomainError::Conflict("username is already taken".into()));
        }
        db.update_username_by_email(&email, &req.username)?
            .ok_or_else(|| DomainError::not_found("user not found"))
    })
    .await?;
    Ok(Json(user))
}
