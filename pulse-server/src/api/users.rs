use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rusqlite::TransactionBehavior;

use pulse_types::{
    FollowResponse, FollowStatusResponse, FollowersResponse, FollowingResponse, OwnProfile,
    PostPreviewsResponse, ProfileSummary, UpdateProfileRequest, UpdateProfileResponse,
};

use super::{connect, parse_id, ApiError, ApiJson, ApiResult, OrInternal};
use crate::auth::AuthUser;
use crate::db::is_constraint_violation;
use crate::db::repositories::{EngagementRepository, FollowRepository, UserRepository};
use crate::state::AppState;
use crate::validation::{non_blank, validate_email, validate_name, validate_username};

/// GET /users/api/profile - The caller's own profile
pub async fn get_own_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<OwnProfile>> {
    let conn = connect(&state)?;
    let profile = EngagementRepository::new(&conn)
        .own_profile(user_id)
        .or_internal("Failed to fetch profile")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(profile))
}

/// PUT /users/api/profile - Change username, name or email.
///
/// Absent or blank fields keep their current value.
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<UpdateProfileResponse>> {
    let username = non_blank(payload.username.as_deref());
    let name = non_blank(payload.name.as_deref());
    let email = non_blank(payload.email.as_deref());

    if username.is_some_and(|u| !validate_username(u)) {
        return Err(ApiError::bad_request("Invalid username"));
    }
    if name.is_some_and(|n| !validate_name(n)) {
        return Err(ApiError::bad_request("Invalid name"));
    }
    if email.is_some_and(|e| !validate_email(e)) {
        return Err(ApiError::bad_request("Invalid email format"));
    }

    let mut conn = connect(&state)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let users = UserRepository::new(&tx);

    let user = users
        .get_by_id(user_id)
        .or_internal("Failed to update profile")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(username) = username {
        if users
            .username_taken(username, user_id)
            .or_internal("Failed to update profile")?
        {
            return Err(ApiError::conflict("Username already taken"));
        }
    }
    if let Some(email) = email {
        if users.email_taken(email, user_id).or_internal("Failed to update profile")? {
            return Err(ApiError::conflict("Email already registered"));
        }
    }

    let username = username.unwrap_or(&user.username).to_string();
    let name = name.unwrap_or(&user.name).to_string();
    let email = email.unwrap_or(&user.email).to_string();

    match users.update_profile(user_id, &username, &name, &email) {
        Ok(()) => {}
        Err(e) if is_constraint_violation(&e) => {
            return Err(ApiError::conflict("Username or email already exists"));
        }
        Err(e) => return Err(e).or_internal("Failed to update profile"),
    }
    tx.commit()?;

    tracing::info!("User {} updated their profile", user_id);

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        user_id,
        username,
        name,
        email,
    }))
}

/// GET /users/:id/profile - Public profile with engagement received
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ProfileSummary>> {
    let user_id = parse_id(&user_id, "Invalid user ID")?;

    let conn = connect(&state)?;
    let summary = EngagementRepository::new(&conn)
        .profile_summary(user_id)
        .or_internal("Failed to fetch user profile")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(summary))
}

/// GET /users/:id/posts - A user's most recent posts
pub async fn get_user_posts(
    State(state): State<AppState>,
    AuthUser(viewer_id): AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<PostPreviewsResponse>> {
    let user_id = parse_id(&user_id, "Invalid user ID")?;

    let conn = connect(&state)?;
    if !UserRepository::new(&conn)
        .exists(user_id)
        .or_internal("Failed to fetch user posts")?
    {
        return Err(ApiError::not_found("User not found"));
    }

    let posts = EngagementRepository::new(&conn)
        .recent_posts(user_id, viewer_id)
        .or_internal("Failed to fetch user posts")?;

    Ok(Json(PostPreviewsResponse { posts }))
}

/// POST /users/:id/follow - Follow the user, or unfollow if already following
pub async fn toggle_follow(
    State(state): State<AppState>,
    AuthUser(follower_id): AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<(StatusCode, Json<FollowResponse>)> {
    let followed_id = parse_id(&user_id, "Invalid user ID")?;

    if followed_id == follower_id {
        return Err(ApiError::bad_request("You cannot follow yourself"));
    }

    let mut conn = connect(&state)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let users = UserRepository::new(&tx);
    for id in [follower_id, followed_id] {
        if !users.exists(id).or_internal("Failed to process follow request")? {
            return Err(ApiError::not_found("User not found"));
        }
    }

    let outcome = FollowRepository::new(&tx)
        .toggle(follower_id, followed_id)
        .or_internal("Failed to process follow request")?;
    tx.commit()?;

    tracing::debug!("User {} follow of {}: {}", follower_id, followed_id, outcome.as_str());

    let (status, message) = if outcome.is_on() {
        (StatusCode::CREATED, "User followed successfully")
    } else {
        (StatusCode::OK, "User unfollowed successfully")
    };

    Ok((
        status,
        Json(FollowResponse {
            message: message.to_string(),
            following: outcome.is_on(),
        }),
    ))
}

/// GET /users/:id/follow/status - Whether the caller follows this user
pub async fn follow_status(
    State(state): State<AppState>,
    AuthUser(follower_id): AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<FollowStatusResponse>> {
    let followed_id = parse_id(&user_id, "Invalid user ID")?;

    if followed_id == follower_id {
        return Ok(Json(FollowStatusResponse { is_following: false }));
    }

    let conn = connect(&state)?;
    let is_following = FollowRepository::new(&conn)
        .is_following(follower_id, followed_id)
        .or_internal("Failed to check follow status")?;

    Ok(Json(FollowStatusResponse { is_following }))
}

/// GET /users/api/followers - Users following the caller
pub async fn get_followers(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<FollowersResponse>> {
    let conn = connect(&state)?;
    let followers = FollowRepository::new(&conn)
        .get_followers(user_id)
        .or_internal("Failed to fetch followers")?;

    Ok(Json(FollowersResponse { followers }))
}

/// GET /users/api/following - Users the caller follows
pub async fn get_following(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<FollowingResponse>> {
    let conn = connect(&state)?;
    let following = FollowRepository::new(&conn)
        .get_following(user_id)
        .or_internal("Failed to fetch following users")?;

    Ok(Json(FollowingResponse { following }))
}
