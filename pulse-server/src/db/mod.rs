pub mod schema;
pub mod connection;
pub mod repositories;
pub mod timestamps;

pub use connection::{Database, DbConnection, DbPool};

/// Whether an error chain bottoms out in a SQLite UNIQUE/constraint violation
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
