use agora_types::{
    Comment, CommentId, Like, LikeId, Photo, PhotoId, Post, PostId, Role, User, UserId,
};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::SocialDb;

/// A user row together with its password hash. Only the login path sees the
/// hash; everything else works with [`User`].
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: String,
}

impl SocialDb {
    // -- Users --

    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &Role,
    ) -> Result<User> {
        self.with_conn(|conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO users (username, email, password, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![username, email, password_hash, role.as_str(), created_at],
            )?;
            Ok(User {
                id: conn.last_insert_rowid(),
                username: username.to_owned(),
                email: email.to_owned(),
                role: role.clone(),
                created_at,
            })
        })
    }

    /// Login lookup: `identity` may be a username or an email address.
    pub fn account_by_identity(&self, identity: &str) -> Result<Option<UserAccount>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, username, email, role, created_at, password FROM users
                     WHERE username = ?1 OR email = ?1",
                    [identity],
                    read_account,
                )
                .optional()?)
        })
    }

    pub fn find_user(&self, id: UserId) -> Result<Option<User>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn update_user(&self, id: UserId, username: &str, email: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE users SET username = ?1, email = ?2 WHERE id = ?3",
                params![username, email, id],
            )?;
            if n == 0 {
                Ok(None)
            } else {
                query_user_by_id(conn, id)
            }
        })
    }

    /// The update-by-username route changes the email only.
    pub fn update_email_by_username(&self, username: &str, email: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE users SET email = ?1 WHERE username = ?2",
                params![email, username],
            )?;
            if n == 0 {
                Ok(None)
            } else {
                query_user_by_username(conn, username)
            }
        })
    }

    /// The update-by-email route changes the username only.
    pub fn update_username_by_email(&self, email: &str, username: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE users SET username = ?1 WHERE email = ?2",
                params![username, email],
            )?;
            if n == 0 {
                Ok(None)
            } else {
                query_user_by_email(conn, email)
            }
        })
    }

    pub fn delete_user(&self, id: UserId) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }

    pub fn promote_admin(&self, username: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE users SET role = 'ADMIN' WHERE username = ?1",
                [username],
            )?;
            Ok(n > 0)
        })
    }

    // -- Posts --

    pub fn create_post(&self, owner_id: UserId, title: &str, body: &str) -> Result<Post> {
        self.with_conn(|conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO posts (owner_id, title, body, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![owner_id, title, body, created_at],
            )?;
            Ok(Post {
                id: conn.last_insert_rowid(),
                owner_id,
                title: title.to_owned(),
                body: body.to_owned(),
                created_at,
            })
        })
    }

    pub fn list_posts(&self, owner_id: UserId) -> Result<Vec<Post>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, title, body, created_at FROM posts
                 WHERE owner_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([owner_id], read_post)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn find_post(&self, id: PostId) -> Result<Option<Post>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, owner_id, title, body, created_at FROM posts WHERE id = ?1",
                    [id],
                    read_post,
                )
                .optional()?)
        })
    }

    pub fn update_post(&self, id: PostId, title: &str, body: &str) -> Result<Option<Post>> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE posts SET title = ?1, body = ?2 WHERE id = ?3",
                params![title, body, id],
            )?;
            if n == 0 {
                return Ok(None);
            }
            Ok(conn
                .query_row(
                    "SELECT id, owner_id, title, body, created_at FROM posts WHERE id = ?1",
                    [id],
                    read_post,
                )
                .optional()?)
        })
    }

    pub fn delete_post(&self, id: PostId) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }

    // -- Comments --

    pub fn create_comment(&self, post_id: PostId, owner_id: UserId, body: &str) -> Result<Comment> {
        self.with_conn(|conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO comments (post_id, owner_id, body, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![post_id, owner_id, body, created_at],
            )?;
            Ok(Comment {
                id: conn.last_insert_rowid(),
                post_id,
                owner_id,
                body: body.to_owned(),
                created_at,
            })
        })
    }

    pub fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, post_id, owner_id, body, created_at FROM comments
                 WHERE post_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([post_id], read_comment)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn find_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, post_id, owner_id, body, created_at FROM comments WHERE id = ?1",
                    [id],
                    read_comment,
                )
                .optional()?)
        })
    }

    pub fn update_comment(&self, id: CommentId, body: &str) -> Result<Option<Comment>> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE comments SET body = ?1 WHERE id = ?2",
                params![body, id],
            )?;
            if n == 0 {
                return Ok(None);
            }
            Ok(conn
                .query_row(
                    "SELECT id, post_id, owner_id, body, created_at FROM comments WHERE id = ?1",
                    [id],
                    read_comment,
                )
                .optional()?)
        })
    }

    pub fn delete_comment(&self, id: CommentId) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }

    // -- Likes --

    pub fn create_like(&self, post_id: PostId, owner_id: UserId) -> Result<Like> {
        self.with_conn(|conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO likes (post_id, owner_id, created_at) VALUES (?1, ?2, ?3)",
                params![post_id, owner_id, created_at],
            )?;
            Ok(Like {
                id: conn.last_insert_rowid(),
                post_id,
                owner_id,
                created_at,
            })
        })
    }

    pub fn list_likes(&self, post_id: PostId) -> Result<Vec<Like>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, post_id, owner_id, created_at FROM likes
                 WHERE post_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([post_id], read_like)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn find_like(&self, id: LikeId) -> Result<Option<Like>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, post_id, owner_id, created_at FROM likes WHERE id = ?1",
                    [id],
                    read_like,
                )
                .optional()?)
        })
    }

    /// The UNIQUE(post_id, owner_id) pair means at most one row here.
    pub fn find_like_by_owner(&self, post_id: PostId, owner_id: UserId) -> Result<Option<Like>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, post_id, owner_id, created_at FROM likes
                     WHERE post_id = ?1 AND owner_id = ?2",
                    params![post_id, owner_id],
                    read_like,
                )
                .optional()?)
        })
    }

    pub fn delete_like(&self, id: LikeId) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM likes WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }

    // -- Photos --

    pub fn create_photo(&self, post_id: PostId, file_name: &str, caption: &str) -> Result<Photo> {
        self.with_conn(|conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO photos (post_id, file_name, caption, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![post_id, file_name, caption, created_at],
            )?;
            Ok(Photo {
                id: conn.last_insert_rowid(),
                post_id,
                file_name: file_name.to_owned(),
                caption: caption.to_owned(),
                created_at,
            })
        })
    }

    pub fn list_photos(&self, post_id: PostId) -> Result<Vec<Photo>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, post_id, file_name, caption, created_at FROM photos
                 WHERE post_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([post_id], read_photo)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn find_photo(&self, id: PhotoId) -> Result<Option<Photo>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, post_id, file_name, caption, created_at FROM photos WHERE id = ?1",
                    [id],
                    read_photo,
                )
                .optional()?)
        })
    }

    pub fn delete_photo(&self, id: PhotoId) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM photos WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }
}

fn query_user_by_id(conn: &Connection, id: UserId) -> Result<Option<User>> {
    Ok(conn
        .query_row(
            "SELECT id, username, email, role, created_at FROM users WHERE id = ?1",
            [id],
            read_user,
        )
        .optional()?)
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    Ok(conn
        .query_row(
            "SELECT id, username, email, role, created_at FROM users WHERE username = ?1",
            [username],
            read_user,
        )
        .optional()?)
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    Ok(conn
        .query_row(
            "SELECT id, username, email, role, created_at FROM users WHERE email = ?1",
            [email],
            read_user,
        )
        .optional()?)
}

fn read_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        role: Role::from(row.get::<_, String>(3)?),
        created_at: row.get(4)?,
    })
}

fn read_account(row: &Row<'_>) -> rusqlite::Result<UserAccount> {
    Ok(UserAccount {
        user: read_user(row)?,
        password_hash: row.get(5)?,
    })
}

fn read_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn read_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        owner_id: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn read_like(row: &Row<'_>) -> rusqlite::Result<Like> {
    Ok(Like {
        id: row.get(0)?,
        post_id: row.get(1)?,
        owner_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn read_photo(row: &Row<'_>) -> rusqlite::Result<Photo> {
    Ok(Photo {
        id: row.get(0)?,
        post_id: row.get(1)?,
        file_name: row.get(2)?,
        caption: row.get(3)?,
        created_at: row.get(4)?,
    })
}
