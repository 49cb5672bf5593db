use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use pulse_types::{AuthorSummary, ToggleOutcome};

use crate::db::timestamps;

pub struct FollowRepository<'a> {
    conn: &'a Connection,
}

impl<'a> FollowRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn find_edge(&self, follower_user_id: i64, followed_user_id: i64) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT follower_id FROM followers
                 WHERE follower_user_id = ? AND followed_user_id = ?",
                (follower_user_id, followed_user_id),
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Check if user A is following user B
    pub fn is_following(&self, follower_user_id: i64, followed_user_id: i64) -> Result<bool> {
        Ok(self.find_edge(follower_user_id, followed_user_id)?.is_some())
    }

    /// Follow if not following, unfollow otherwise.
    ///
    /// Callers reject self-follows before calling this.
    pub fn toggle(&self, follower_user_id: i64, followed_user_id: i64) -> Result<ToggleOutcome> {
        match self.find_edge(follower_user_id, followed_user_id)? {
            Some(edge_id) => {
                self.conn
                    .execute("DELETE FROM followers WHERE follower_id = ?", [edge_id])
                    .context("Failed to unfollow user")?;
                Ok(ToggleOutcome::Removed)
            }
            None => {
                self.conn
                    .execute(
                        "INSERT INTO followers (follower_user_id, followed_user_id, created_at)
                         VALUES (?, ?, ?)
                         ON CONFLICT(follower_user_id, followed_user_id) DO NOTHING",
                        (
                            follower_user_id,
                            followed_user_id,
                            timestamps::to_db(&Utc::now()),
                        ),
                    )
                    .context("Failed to follow user")?;
                Ok(ToggleOutcome::Added)
            }
        }
    }

    /// Get follower count
    pub fn get_follower_count(&self, user_id: i64) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM followers WHERE followed_user_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get following count
    pub fn get_following_count(&self, user_id: i64) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM followers WHERE follower_user_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Users that follow this user, most recent first
    pub fn get_followers(&self, user_id: i64) -> Result<Vec<AuthorSummary>> {
        self.list_users(
            "SELECT u.user_id, u.username, u.name
             FROM users u
             JOIN followers f ON u.user_id = f.follower_user_id
             WHERE f.followed_user_id = ?
             ORDER BY f.created_at DESC, f.follower_id DESC",
            user_id,
        )
    }

    /// Users this user follows, most recent first
    pub fn get_following(&self, user_id: i64) -> Result<Vec<AuthorSummary>> {
        self.list_users(
            "SELECT u.user_id, u.username, u.name
             FROM users u
             JOIN followers f ON u.user_id = f.followed_user_id
             WHERE f.follower_user_id = ?
             ORDER BY f.created_at DESC, f.follower_id DESC",
            user_id,
        )
    }

    fn list_users(&self, sql: &str, user_id: i64) -> Result<Vec<AuthorSummary>> {
        let mut stmt = self.conn.prepare(sql)?;
        let users = stmt
            .query_map([user_id], |row| {
                Ok(AuthorSummary {
                    user_id: row.get(0)?,
                    username: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}
