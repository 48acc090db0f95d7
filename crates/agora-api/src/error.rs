use agora_types::DomainError;
use agora_types::api::ErrorBody;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Body of every 401. Points the caller at the two entry points instead of
/// leaking why their request carried no usable identity.
pub const AUTH_REQUIRED: &str =
    "Authentication required: log in via POST /auth/login or register via POST /auth/register";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("invalid credentials")]
    BadCredentials,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("internal error")]
    Internal,
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Domain(DomainError::Store(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, AUTH_REQUIRED.to_owned()),
            ApiError::BadCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Domain(err) => {
                let status = match &err {
                    DomainError::AccessDenied => StatusCode::FORBIDDEN,
                    DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                    DomainError::Validation(_) | DomainError::SameParticipant => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    DomainError::AlreadyExists(_) | DomainError::Conflict(_) => {
                        StatusCode::CONFLICT
                    }
                    DomainError::Store(e) => {
                        error!("store failure: {e:#}");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    "internal error".to_owned()
                } else {
                    err.to_string()
                };
                (status, message)
            }
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Runs a closure that talks to SQLite off the async runtime and folds both
/// failure layers into [`ApiError`].
pub async fn run_blocking<T, E, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(Into::into),
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            Err(ApiError::Internal)
        }
    }
}
