use thiserror::Error;

/// Failures surfaced by the domain services, transport-agnostic.
///
/// `AccessDenied` carries one fixed message on purpose: a denial must not
/// reveal whether the addressed resource exists. `NotFound` is reserved for
/// callers whose entitlement was already established before the missing hop.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Access denied")]
    AccessDenied,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("a conversation needs two distinct participants")]
    SameParticipant,

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        DomainError::NotFound(what.into())
    }

    pub fn validation(what: impl Into<String>) -> Self {
        DomainError::Validation(what.into())
    }
}
