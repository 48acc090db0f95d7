//! HTTP surface of Agora: route table, handlers, the authentication layer
//! and the error-to-status mapping.

pub mod auth;
pub mod comments;
pub mod error;
pub mod likes;
pub mod messenger;
pub mod middleware;
pub mod photos;
pub mod posts;
pub mod router;
pub mod state;
pub mod users;

pub use error::{ApiError, AUTH_REQUIRED};
pub use middleware::CurrentUser;
pub use router::router;
pub use state::{AppState, AppStateInner};
