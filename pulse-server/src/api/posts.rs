use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rusqlite::TransactionBehavior;
use serde::Deserialize;

use pulse_types::{
    CommentResponse, CommentView, CreateCommentRequest, CreatePostRequest, CreatePostResponse,
    DiscoverResponse, LikeResponse, UserPostsResponse,
};

use super::{connect, parse_id, ApiError, ApiJson, ApiResult, OrInternal};
use crate::auth::AuthUser;
use crate::db::repositories::{
    CommentRepository, DiscoverFilter, EngagementRepository, LikeRepository, PostRepository,
    UserRepository,
};
use crate::state::AppState;
use crate::validation::has_text;

#[derive(Debug, Default, Deserialize)]
pub struct DiscoverQuery {
    date_from: Option<String>,
    date_to: Option<String>,
    min_likes: Option<String>,
    author: Option<String>,
}

/// POST /posts/api/create - Publish a post as the caller
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<CreatePostResponse>)> {
    let content = has_text(payload.content.as_deref())
        .ok_or_else(|| ApiError::bad_request("Post content is required"))?;

    let mut conn = connect(&state)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if !UserRepository::new(&tx).exists(user_id).or_internal("Failed to create post")? {
        return Err(ApiError::not_found("User not found"));
    }

    let post = PostRepository::new(&tx)
        .create(user_id, content, Utc::now())
        .or_internal("Failed to create post")?;
    tx.commit()?;

    tracing::debug!("User {} created post {}", user_id, post.post_id);

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            message: "Post created successfully".to_string(),
            post_id: post.post_id,
        }),
    ))
}

/// GET /posts/api/discover - Recent posts from everyone, optionally filtered
pub async fn discover(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<DiscoverQuery>,
) -> ApiResult<Json<DiscoverResponse>> {
    let filter = DiscoverFilter::from_params(
        query.date_from.as_deref(),
        query.date_to.as_deref(),
        query.min_likes.as_deref(),
        query.author.as_deref(),
    );

    let conn = connect(&state)?;
    let posts = EngagementRepository::new(&conn)
        .discover(&filter, user_id)
        .or_internal("Failed to fetch posts")?;

    Ok(Json(DiscoverResponse { posts }))
}

/// GET /posts/api/user - The caller's own posts with likes and comments
pub async fn user_posts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserPostsResponse>> {
    let conn = connect(&state)?;
    let posts = EngagementRepository::new(&conn)
        .user_timeline(user_id)
        .or_internal("Failed to fetch user posts")?;

    Ok(Json(UserPostsResponse { posts }))
}

/// POST /posts/:id/like - Like the post, or remove an existing like
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<String>,
) -> ApiResult<(StatusCode, Json<LikeResponse>)> {
    let post_id = parse_id(&post_id, "Invalid post ID")?;

    let mut conn = connect(&state)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if !UserRepository::new(&tx).exists(user_id).or_internal("Failed to process like")? {
        return Err(ApiError::not_found("User not found"));
    }
    if PostRepository::new(&tx)
        .get_by_id(post_id)
        .or_internal("Failed to process like")?
        .is_none()
    {
        return Err(ApiError::not_found("Post not found"));
    }

    let outcome = LikeRepository::new(&tx)
        .toggle(post_id, user_id)
        .or_internal("Failed to process like")?;
    tx.commit()?;

    tracing::debug!("User {} like on post {}: {}", user_id, post_id, outcome.as_str());

    let (status, message) = if outcome.is_on() {
        (StatusCode::CREATED, "Post liked successfully")
    } else {
        (StatusCode::OK, "Post unliked successfully")
    };

    Ok((
        status,
        Json(LikeResponse {
            message: message.to_string(),
            liked: outcome.is_on(),
        }),
    ))
}

/// POST /posts/:id/comments - Comment on a post
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<String>,
    ApiJson(payload): ApiJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    let post_id = parse_id(&post_id, "Invalid post ID")?;
    let content = has_text(payload.content.as_deref())
        .ok_or_else(|| ApiError::bad_request("Comment content is required"))?;

    let mut conn = connect(&state)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if PostRepository::new(&tx)
        .get_by_id(post_id)
        .or_internal("Failed to add comment")?
        .is_none()
    {
        return Err(ApiError::not_found("Post not found"));
    }

    let author = UserRepository::new(&tx)
        .get_by_id(user_id)
        .or_internal("Failed to add comment")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let comment = CommentRepository::new(&tx)
        .create(post_id, user_id, content, Utc::now())
        .or_internal("Failed to add comment")?;
    tx.commit()?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            message: "Comment added successfully".to_string(),
            comment: CommentView {
                comment_id: comment.comment_id,
                content: comment.content,
                created_at: comment.created_at,
                author: author.summary(),
            },
        }),
    ))
}
