use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

use pulse_types::User;

use crate::db::timestamps;

const USER_COLUMNS: &str = "user_id, username, name, email, created_at";

pub struct UserRepository<'a> {
    conn: &'a Connection,
}

impl<'a> UserRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            user_id: row.get(0)?,
            username: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            created_at: timestamps::from_db(4, row.get(4)?)?,
        })
    }

    /// Create a new user, returning its id.
    ///
    /// A duplicate username or email surfaces as a constraint violation
    /// (see [`crate::db::is_constraint_violation`]).
    pub fn create(
        &self,
        username: &str,
        name: &str,
        email: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO users (username, name, email, password_hash, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                (username, name, email, password_hash, timestamps::to_db(&created_at)),
            )
            .context("Failed to create user")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get user by ID
    pub fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE user_id = ?", USER_COLUMNS),
                [user_id],
                Self::map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get user by username
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS),
                [username],
                Self::map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user together with the stored password hash, for login
    pub fn get_credentials(&self, username: &str) -> Result<Option<(User, String)>> {
        let credentials = self
            .conn
            .query_row(
                &format!(
                    "SELECT {}, password_hash FROM users WHERE username = ?",
                    USER_COLUMNS
                ),
                [username],
                |row| Ok((Self::map_user(row)?, row.get::<_, String>(5)?)),
            )
            .optional()?;
        Ok(credentials)
    }

    pub fn exists(&self, user_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE user_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Whether a user other than `except_user_id` already has this username
    pub fn username_taken(&self, username: &str, except_user_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ? AND user_id != ?",
            (username, except_user_id),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Whether a user other than `except_user_id` already has this email
    pub fn email_taken(&self, email: &str, except_user_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ? AND user_id != ?",
            (email, except_user_id),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Overwrite the editable profile fields
    pub fn update_profile(&self, user_id: i64, username: &str, name: &str, email: &str) -> Result<()> {
        self.conn
            .execute(
                "UPDATE users SET username = ?, name = ?, email = ? WHERE user_id = ?",
                (username, name, email, user_id),
            )
            .context("Failed to update user profile")?;
        Ok(())
    }
}
