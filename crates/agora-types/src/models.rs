use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type PostId = i64;
pub type CommentId = i64;
pub type LikeId = i64;
pub type PhotoId = i64;
pub type ConversationId = i64;

/// User role as stored in the relational store. Anything that is not the
/// administrator or the default role round-trips untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    User,
    Custom(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::Custom(name) => name.as_str(),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "ADMIN" => Role::Admin,
            "USER" => Role::User,
            other => Role::Custom(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Resolved caller identity for the duration of one request.
///
/// Built by the authentication middleware from a validated token subject plus
/// one user lookup; never persisted, dropped when the request ends.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_self(&self, user: UserId) -> bool {
        self.id == user
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub owner_id: UserId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub owner_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: LikeId,
    pub post_id: PostId,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Photo metadata. The bytes themselves live in object storage outside this
/// system; only the row that hangs the photo under a post is kept here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub post_id: PostId,
    pub file_name: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
}

/// One participant's side of a 1:1 conversation.
///
/// Every conversation between users A and B exists as exactly two rows: one
/// with `owner = A, recipient = B` and one with `owner = B, recipient = A`.
/// The two rows share no identifier; each side addresses the conversation
/// through its own `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub owner_id: UserId,
    pub recipient_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A message body in the document store, keyed by the side-record id it was
/// written under. Nothing copies a body across to the mirror side's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: ConversationId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
