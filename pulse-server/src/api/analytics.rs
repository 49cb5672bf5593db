use axum::{extract::State, Json};

use pulse_types::{EngagementByDateResponse, TopPostsResponse, UserStats};

use super::{connect, ApiResult, OrInternal};
use crate::auth::AuthUser;
use crate::db::repositories::EngagementRepository;
use crate::state::AppState;

/// GET /posts/api/stats - Totals and averages for the caller's posts
pub async fn stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserStats>> {
    let conn = connect(&state)?;
    let stats = EngagementRepository::new(&conn)
        .user_stats(user_id)
        .or_internal("Failed to fetch post statistics")?;

    Ok(Json(stats))
}

/// GET /posts/api/top-posts - Most engaging posts across all users
pub async fn top_posts(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> ApiResult<Json<TopPostsResponse>> {
    let conn = connect(&state)?;
    let top_posts = EngagementRepository::new(&conn)
        .top_posts()
        .or_internal("Failed to fetch top posts")?;

    Ok(Json(TopPostsResponse { top_posts }))
}

/// GET /posts/api/engagement-by-date - Daily engagement on the caller's posts
pub async fn engagement_by_date(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<EngagementByDateResponse>> {
    let conn = connect(&state)?;
    let engagement_by_date = EngagementRepository::new(&conn)
        .engagement_by_date(user_id)
        .or_internal("Failed to fetch engagement data")?;

    Ok(Json(EngagementByDateResponse { engagement_by_date }))
}
