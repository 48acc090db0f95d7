use agora_types::{Principal, UserLookup};
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{HeaderMap, header};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the caller from the `Authorization` header and stashes a
/// [`Principal`] in the request extensions. This layer never rejects:
/// requests without a usable token proceed anonymous, and the endpoint guard
/// decides what that means.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(principal) = resolve(&state, req.headers()).await {
        req.extensions_mut().insert(principal);
    }
    next.run(req).await
}

// Borrows only the headers: `&Request` would hold the `!Sync` body across
// the `.await` below and make the middleware future `!Send`.
async fn resolve(state: &AppState, headers: &HeaderMap) -> Option<Principal> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;

    match state.tokens.validate(token) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(err) => {
            warn!("rejecting unusable bearer token: {}", err);
            return None;
        }
    }
    let subject = state.tokens.subject_of(token).ok()?;

    let db = state.db.clone();
    let user = match tokio::task::spawn_blocking(move || db.by_identity(&subject)).await {
        Ok(Ok(user)) => user?,
        Ok(Err(err)) => {
            warn!("user lookup failed during authentication: {err:#}");
            return None;
        }
        Err(err) => {
            warn!("spawn_blocking join error: {}", err);
            return None;
        }
    };
    Some(Principal {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    })
}

/// Extracts the [`Principal`] placed by [`authenticate`]. Handlers that take
/// this reject anonymous requests with the fixed 401 body.
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ApiError::Unauthenticated)
    }
}
