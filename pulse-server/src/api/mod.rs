pub mod analytics;
pub mod auth;
pub mod error;
pub mod json;
pub mod posts;
pub mod users;

pub use error::{ApiError, ApiResult, OrInternal};
pub use json::ApiJson;

use crate::db::DbConnection;
use crate::state::AppState;

/// Check out a pooled connection for the current request
pub(crate) fn connect(state: &AppState) -> ApiResult<DbConnection> {
    Ok(state.db.pool.get()?)
}

/// Parse a numeric path segment, reporting `message` when it is not an id
pub(crate) fn parse_id(raw: &str, message: &str) -> ApiResult<i64> {
    raw.parse().map_err(|_| ApiError::bad_request(message))
}
