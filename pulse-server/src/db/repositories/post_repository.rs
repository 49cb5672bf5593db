use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

use pulse_types::Post;

use crate::db::timestamps;

pub struct PostRepository<'a> {
    conn: &'a Connection,
}

impl<'a> PostRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn map_post(row: &Row<'_>) -> rusqlite::Result<Post> {
        Ok(Post {
            post_id: row.get(0)?,
            user_id: row.get(1)?,
            content: row.get(2)?,
            created_at: timestamps::from_db(3, row.get(3)?)?,
        })
    }

    /// Create a new post
    pub fn create(&self, user_id: i64, content: &str, created_at: DateTime<Utc>) -> Result<Post> {
        self.conn
            .execute(
                "INSERT INTO posts (user_id, content, created_at) VALUES (?, ?, ?)",
                (user_id, content, timestamps::to_db(&created_at)),
            )
            .context("Failed to create post")?;

        Ok(Post {
            post_id: self.conn.last_insert_rowid(),
            user_id,
            content: content.to_string(),
            created_at,
        })
    }

    /// Get a single post by ID
    pub fn get_by_id(&self, post_id: i64) -> Result<Option<Post>> {
        let post = self
            .conn
            .query_row(
                "SELECT post_id, user_id, content, created_at FROM posts WHERE post_id = ?",
                [post_id],
                Self::map_post,
            )
            .optional()?;
        Ok(post)
    }

    /// Get posts by a specific user, newest first
    pub fn get_by_user(&self, user_id: i64, limit: Option<i64>) -> Result<Vec<Post>> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.unwrap_or(-1);
        let mut stmt = self.conn.prepare(
            "SELECT post_id, user_id, content, created_at
             FROM posts
             WHERE user_id = ?
             ORDER BY created_at DESC, post_id DESC
             LIMIT ?",
        )?;

        let posts = stmt
            .query_map((user_id, limit), Self::map_post)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Get post count for a user
    pub fn get_post_count(&self, user_id: i64) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE user_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
