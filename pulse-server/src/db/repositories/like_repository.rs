use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use pulse_types::{Like, ToggleOutcome};

use crate::db::timestamps;

pub struct LikeRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LikeRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Get a user's like on a post
    pub fn get_like(&self, post_id: i64, user_id: i64) -> Result<Option<Like>> {
        let like = self
            .conn
            .query_row(
                "SELECT like_id, post_id, user_id, created_at
                 FROM likes
                 WHERE post_id = ? AND user_id = ?",
                (post_id, user_id),
                |row| {
                    Ok(Like {
                        like_id: row.get(0)?,
                        post_id: row.get(1)?,
                        user_id: row.get(2)?,
                        created_at: timestamps::from_db(3, row.get(3)?)?,
                    })
                },
            )
            .optional()?;
        Ok(like)
    }

    pub fn has_liked(&self, post_id: i64, user_id: i64) -> Result<bool> {
        Ok(self.get_like(post_id, user_id)?.is_some())
    }

    pub fn count_for_post(&self, post_id: i64) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE post_id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Flip the like state of (post, user): delete an existing like, or insert one.
    ///
    /// Run inside a write transaction so the check and the write see the same state.
    pub fn toggle(&self, post_id: i64, user_id: i64) -> Result<ToggleOutcome> {
        match self.get_like(post_id, user_id)? {
            Some(like) => {
                self.conn
                    .execute("DELETE FROM likes WHERE like_id = ?", [like.like_id])
                    .context("Failed to delete like")?;
                Ok(ToggleOutcome::Removed)
            }
            None => {
                // A concurrent duplicate collapses onto the existing row
                self.conn
                    .execute(
                        "INSERT INTO likes (post_id, user_id, created_at) VALUES (?, ?, ?)
                         ON CONFLICT(post_id, user_id) DO NOTHING",
                        (post_id, user_id, timestamps::to_db(&Utc::now())),
                    )
                    .context("Failed to insert like")?;
                Ok(ToggleOutcome::Added)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::setup_test_db;
    use crate::db::repositories::{PostRepository, UserRepository};
    use crate::db::Database;
    use proptest::prelude::*;

    fn seed_post(db: &Database) -> (i64, i64) {
        let conn = db.connection().unwrap();
        let alice = UserRepository::new(&conn)
            .create("alice", "Alice", "alice@example.com", "hash", Utc::now())
            .unwrap();
        let post = PostRepository::new(&conn)
            .create(alice, "hello", Utc::now())
            .unwrap();
        (alice, post.post_id)
    }

    #[test]
    fn test_toggle_like_on_then_off() {
        let db = setup_test_db();
        let (alice, post_id) = seed_post(&db);
        let conn = db.connection().unwrap();
        let repo = LikeRepository::new(&conn);

        assert_eq!(repo.toggle(post_id, alice).unwrap(), ToggleOutcome::Added);
        assert!(repo.has_liked(post_id, alice).unwrap());
        assert_eq!(repo.count_for_post(post_id).unwrap(), 1);

        assert_eq!(repo.toggle(post_id, alice).unwrap(), ToggleOutcome::Removed);
        assert!(!repo.has_liked(post_id, alice).unwrap());
        assert_eq!(repo.count_for_post(post_id).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_insert_is_collapsed() {
        let db = setup_test_db();
        let (alice, post_id) = seed_post(&db);
        let conn = db.connection().unwrap();

        for _ in 0..2 {
            conn.execute(
                "INSERT INTO likes (post_id, user_id, created_at) VALUES (?, ?, ?)
                 ON CONFLICT(post_id, user_id) DO NOTHING",
                (post_id, alice, "2024-01-01T00:00:00.000000Z"),
            )
            .unwrap();
        }

        assert_eq!(LikeRepository::new(&conn).count_for_post(post_id).unwrap(), 1);
    }

    // For any number of toggles N, the final like state is on iff N is odd,
    // and every toggle reports the alternating on/off sequence.
    proptest! {
        #[test]
        fn prop_toggle_parity(toggles in 1usize..12) {
            let db = setup_test_db();
            let (alice, post_id) = seed_post(&db);
            let conn = db.connection().unwrap();
            let repo = LikeRepository::new(&conn);

            for i in 0..toggles {
                let outcome = repo.toggle(post_id, alice).unwrap();
                prop_assert_eq!(outcome.is_on(), i % 2 == 0);
            }

            prop_assert_eq!(repo.has_liked(post_id, alice).unwrap(), toggles % 2 == 1);
            prop_assert!(repo.count_for_post(post_id).unwrap() <= 1);
        }
    }
}
