use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use rusqlite::TransactionBehavior;

use pulse_types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use super::{connect, ApiError, ApiJson, ApiResult, OrInternal};
use crate::auth::{hash_password, verify_password};
use crate::db::{is_constraint_violation, repositories::UserRepository};
use crate::state::AppState;
use crate::validation::{
    non_blank, validate_email, validate_name, validate_password, validate_username,
};

/// POST /auth/register - Create an account
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let username = non_blank(payload.username.as_deref());
    let name = non_blank(payload.name.as_deref());
    let email = non_blank(payload.email.as_deref());
    let password = payload.password.as_deref().filter(|p| !p.is_empty());

    let (Some(username), Some(name), Some(email), Some(password)) = (username, name, email, password)
    else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    if !validate_username(username) {
        return Err(ApiError::bad_request("Invalid username"));
    }
    if !validate_name(name) {
        return Err(ApiError::bad_request("Invalid name"));
    }
    if !validate_email(email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    if !validate_password(password) {
        return Err(ApiError::bad_request("Password does not meet requirements"));
    }

    let password_hash = hash_password(password)?;

    let mut conn = connect(&state)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let user_id = match UserRepository::new(&tx).create(username, name, email, &password_hash, Utc::now()) {
        Ok(user_id) => user_id,
        Err(e) if is_constraint_violation(&e) => {
            tracing::debug!("Registration conflict for {}: {:#}", username, e);
            return Err(ApiError::conflict("Username or email already exists"));
        }
        Err(e) => return Err(e).or_internal("Failed to register user"),
    };
    tx.commit()?;

    tracing::info!("Registered user {} ({})", username, user_id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id,
        }),
    ))
}

/// POST /auth/login - Exchange credentials for an access token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (Some(username), Some(password)) = (
        non_blank(payload.username.as_deref()),
        payload.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Missing username or password"));
    };

    let conn = connect(&state)?;
    let credentials = UserRepository::new(&conn)
        .get_credentials(username)
        .or_internal("Failed to log in")?;
    drop(conn);

    let user = match credentials {
        Some((user, hash)) if verify_password(password, &hash) => user,
        _ => {
            tracing::warn!("Failed login attempt for {}", username);
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
    };

    let access_token = state.tokens.issue(user.user_id)?;
    tracing::info!("User {} logged in", user.username);

    Ok(Json(LoginResponse {
        access_token,
        user_id: user.user_id,
        username: user.username,
    }))
}
