use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use pulse_types::{AuthorSummary, Comment, CommentView};

use crate::db::timestamps;

pub struct CommentRepository<'a> {
    conn: &'a Connection,
}

impl<'a> CommentRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Add a comment to a post
    pub fn create(
        &self,
        post_id: i64,
        user_id: i64,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Comment> {
        self.conn
            .execute(
                "INSERT INTO comments (post_id, user_id, content, created_at) VALUES (?, ?, ?, ?)",
                (post_id, user_id, content, timestamps::to_db(&created_at)),
            )
            .context("Failed to create comment")?;

        Ok(Comment {
            comment_id: self.conn.last_insert_rowid(),
            post_id,
            user_id,
            content: content.to_string(),
            created_at,
        })
    }

    /// All comments on a post, oldest first, with author identity inlined
    pub fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.comment_id, c.content, c.created_at, u.user_id, u.username, u.name
             FROM comments c
             JOIN users u ON u.user_id = c.user_id
             WHERE c.post_id = ?
             ORDER BY c.created_at ASC, c.comment_id ASC",
        )?;

        let comments = stmt
            .query_map([post_id], |row| {
                Ok(CommentView {
                    comment_id: row.get(0)?,
                    content: row.get(1)?,
                    created_at: timestamps::from_db(2, row.get(2)?)?,
                    author: AuthorSummary {
                        user_id: row.get(3)?,
                        username: row.get(4)?,
                        name: row.get(5)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{at, setup_test_db};
    use crate::db::repositories::{PostRepository, UserRepository};

    #[test]
    fn test_comments_are_listed_oldest_first_with_authors() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let users = UserRepository::new(&conn);
        let alice = users
            .create("alice", "Alice", "alice@example.com", "hash", Utc::now())
            .unwrap();
        let bob = users
            .create("bob", "Bob", "bob@example.com", "hash", Utc::now())
            .unwrap();
        let post = PostRepository::new(&conn)
            .create(alice, "hello", at("2024-01-01T10:00:00Z"))
            .unwrap();

        let repo = CommentRepository::new(&conn);
        repo.create(post.post_id, bob, "later", at("2024-01-01T12:00:00Z"))
            .unwrap();
        repo.create(post.post_id, alice, "earlier", at("2024-01-01T11:00:00Z"))
            .unwrap();

        let comments = repo.list_for_post(post.post_id).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "earlier");
        assert_eq!(comments[0].author.username, "alice");
        assert_eq!(comments[1].author.name, "Bob");
    }

    #[test]
    fn test_comment_on_missing_post_fails() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let alice = UserRepository::new(&conn)
            .create("alice", "Alice", "alice@example.com", "hash", Utc::now())
            .unwrap();

        let result = CommentRepository::new(&conn).create(42, alice, "nope", Utc::now());
        assert!(result.is_err());
    }
}
