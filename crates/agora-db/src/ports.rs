//! Trait implementations wiring [`SocialDb`] into the engine and the
//! messenger service.

use agora_authz::{CommentRef, ConversationRef, LikeRef, OwnershipLookup, PhotoRef, PostRef};
use agora_messenger::{ConversationInsertError, ConversationStore};
use agora_types::{
    CommentId, Conversation, ConversationId, LikeId, PhotoId, PostId, User, UserId, UserLookup,
};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};

use crate::SocialDb;

impl OwnershipLookup for SocialDb {
    fn post_ref(&self, id: PostId) -> Result<Option<PostRef>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    // Owner username rides along so the photo-delete check
                    // costs one read, not two.
                    "SELECT p.id, p.owner_id, u.username
                     FROM posts p
                     JOIN users u ON p.owner_id = u.id
                     WHERE p.id = ?1",
                    [id],
                    |row| {
                        Ok(PostRef {
                            id: row.get(0)?,
                            owner_id: row.get(1)?,
                            owner_username: row.get(2)?,
                        })
                    },
                )
                .optional()?)
        })
    }

    fn comment_ref(&self, id: CommentId) -> Result<Option<CommentRef>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, post_id, owner_id FROM comments WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(CommentRef {
                            id: row.get(0)?,
                            post_id: row.get(1)?,
                            owner_id: row.get(2)?,
                        })
                    },
                )
                .optional()?)
        })
    }

    fn like_ref(&self, id: LikeId) -> Result<Option<LikeRef>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, post_id, owner_id FROM likes WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(LikeRef {
                            id: row.get(0)?,
                            post_id: row.get(1)?,
                            owner_id: row.get(2)?,
                        })
                    },
                )
                .optional()?)
        })
    }

    fn photo_ref(&self, id: PhotoId) -> Result<Option<PhotoRef>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, post_id FROM photos WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(PhotoRef {
                            id: row.get(0)?,
                            post_id: row.get(1)?,
                        })
                    },
                )
                .optional()?)
        })
    }

    fn conversation_ref(&self, id: ConversationId) -> Result<Option<ConversationRef>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, owner_id, recipient_id FROM conversations WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(ConversationRef {
                            id: row.get(0)?,
                            owner_id: row.get(1)?,
                            recipient_id: row.get(2)?,
                        })
                    },
                )
                .optional()?)
        })
    }
}

impl UserLookup for SocialDb {
    fn by_identity(&self, identity: &str) -> Result<Option<User>> {
        Ok(self.account_by_identity(identity)?.map(|a| a.user))
    }

    fn by_id(&self, id: UserId) -> Result<Option<User>> {
        self.find_user(id)
    }

    fn by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_user_by_username(username)
    }
}

impl ConversationStore for SocialDb {
    fn insert(
        &self,
        owner: UserId,
        recipient: UserId,
    ) -> std::result::Result<Conversation, ConversationInsertError> {
        let created_at = Utc::now();
        let inserted = self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO conversations (owner_id, recipient_id, created_at) VALUES (?1, ?2, ?3)",
                params![owner, recipient, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        });
        match inserted {
            Ok(id) => Ok(Conversation {
                id,
                owner_id: owner,
                recipient_id: recipient,
                created_at,
            }),
            Err(err) => Err(classify_insert(err)),
        }
    }

    fn find(&self, id: ConversationId) -> Result<Option<Conversation>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, owner_id, recipient_id, created_at FROM conversations WHERE id = ?1",
                    [id],
                    read_conversation,
                )
                .optional()?)
        })
    }

    fn list_for_owner(&self, owner: UserId) -> Result<Vec<Conversation>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, recipient_id, created_at FROM conversations
                 WHERE owner_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([owner], read_conversation)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn delete(&self, id: ConversationId) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM conversations WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }
}

fn read_conversation(row: &Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        recipient_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

// A fired UNIQUE constraint is the one failure the service reacts to; every
// other sqlite error stays opaque.
fn classify_insert(err: anyhow::Error) -> ConversationInsertError {
    if let Some(rusqlite::Error::SqliteFailure(e, _)) = err.downcast_ref::<rusqlite::Error>() {
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return ConversationInsertError::AlreadyExists;
        }
    }
    ConversationInsertError::Store(err)
}
