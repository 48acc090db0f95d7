//! Stateless bearer tokens and password hashing for Agora.

pub mod password;
pub mod token;

pub use token::{AuthError, TokenKey, TokenService, MIN_TOKEN_LEN};
