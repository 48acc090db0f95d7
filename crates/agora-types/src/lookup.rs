use crate::models::{User, UserId};

/// Read-only access to user accounts.
///
/// Canonical definition lives here so the authentication middleware and the
/// messenger service share one port instead of duplicating it. `by_identity`
/// matches the login identity, which may be either a username or an email
/// address.
pub trait UserLookup: Send + Sync {
    fn by_identity(&self, identity: &str) -> anyhow::Result<Option<User>>;

    fn by_id(&self, id: UserId) -> anyhow::Result<Option<User>>;

    /// Exact-username match, never email.
    fn by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
}
