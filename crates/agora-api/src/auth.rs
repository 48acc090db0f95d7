use agora_auth::password;
use agora_types::api::{LoginRequest, RegisterRequest, TokenResponse};
use agora_types::{DomainError, Role};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{error, info};

use crate::error::{ApiError, run_blocking};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    if req.username.trim().len() < 3 || req.username.len() > 32 {
        return Err(DomainError::validation("username must be 3-32 characters").into());
    }
    if req.password.len() < 8 {
        return Err(DomainError::validation("password must be at least 8 characters").into());
    }
    if !req.email.contains('@') {
        return Err(DomainError::validation("email address is not valid").into());
    }

    let password_hash = password::hash(&req.password)?;

    let db = state.db.clone();
    let user = run_blocking(move || {
        // Check-first keeps the common failure a clean conflict; the UNIQUE
        // columns still backstop races.
        if db.find_user_by_username(&req.username)?.is_some() {
            return Err(DomainError::Conflict("username is already taken".into()));
        }
        if db.find_user_by_email(&req.email)?.is_some() {
            return Err(DomainError::Conflict("email is already registered".into()));
        }
        Ok(db.create_user(&req.username, &req.email, &password_hash, &Role::User)?)
    })
    .await?;

    let token = issue_for(&state, &user.username)?;
    info!("registered user {} ({})", user.username, user.id);
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            user_id: user.id,
            username: user.username,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let identity = req.identity.clone();
    let account = run_blocking(move || db.account_by_identity(&identity))
        .await?
        .ok_or(ApiError::BadCredentials)?;

    if !password::matches(&req.password, &account.password_hash) {
        return Err(ApiError::BadCredentials);
    }

    let user = account.user;
    let token = issue_for(&state, &user.username)?;
    info!("user {} ({}) logged in", user.username, user.id);
    Ok(Json(TokenResponse {
        user_id: user.id,
        username: user.username,
        token,
    }))
}

// Tokens always carry the canonical username, whichever identity the caller
// presented.
fn issue_for(state: &AppState, username: &str) -> Result<String, ApiError> {
    state.tokens.issue(username).map_err(|e| {
        error!("token issue failed for {}: {}", username, e);
        ApiError::Internal
    })
}
