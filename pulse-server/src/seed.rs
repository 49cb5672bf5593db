use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::TransactionBehavior;

use crate::auth::hash_password;
use crate::db::repositories::UserRepository;
use crate::db::schema::DEMO_CONTENT;
use crate::db::Database;

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "password123";

const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("alice", "Alice Johnson", "alice@example.com"),
    ("bob", "Bob Smith", "bob@example.com"),
    ("charlie", "Charlie Brown", "charlie@example.com"),
    ("diana", "Diana Prince", "diana@example.com"),
];

/// Insert demo users and, on a fresh database, their posts, likes, comments
/// and follows. Existing demo users are left untouched.
///
/// Returns the number of users inserted.
pub fn seed_demo_data(db: &Database) -> Result<usize> {
    let password_hash = hash_password(DEMO_PASSWORD)?;

    let mut conn = db.connection()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let users = UserRepository::new(&tx);

    let mut inserted = 0;
    for &(username, name, email) in DEMO_USERS {
        if users.get_by_username(username)?.is_some() {
            continue;
        }
        users.create(username, name, email, &password_hash, Utc::now())?;
        inserted += 1;
    }

    if inserted == DEMO_USERS.len() {
        tx.execute_batch(DEMO_CONTENT)
            .context("Failed to seed demo content")?;
    }
    tx.commit()?;

    Ok(inserted)
}
