use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::state::AppState;

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        // Authentication routes
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        // Post routes
        .route("/posts/api/create", post(api::posts::create_post))
        .route("/posts/api/discover", get(api::posts::discover))
        .route("/posts/api/user", get(api::posts::user_posts))
        .route("/posts/:id/like", post(api::posts::toggle_like))
        .route("/posts/:id/comments", post(api::posts::add_comment))
        // Analytics routes
        .route("/posts/api/stats", get(api::analytics::stats))
        .route("/posts/api/top-posts", get(api::analytics::top_posts))
        .route("/posts/api/engagement-by-date", get(api::analytics::engagement_by_date))
        // User routes
        .route(
            "/users/api/profile",
            get(api::users::get_own_profile).put(api::users::update_profile),
        )
        .route("/users/api/profile/update", put(api::users::update_profile))
        .route("/users/api/followers", get(api::users::get_followers))
        .route("/users/api/following", get(api::users::get_following))
        .route("/users/:id/profile", get(api::users::get_profile))
        .route("/users/:id/posts", get(api::users::get_user_posts))
        .route("/users/:id/follow", post(api::users::toggle_follow))
        .route("/users/:id/follow/status", get(api::users::follow_status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn welcome() -> Json<Value> {
    Json(json!({
        "name": "pulse",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": ["/auth/register", "/auth/login"],
            "posts": ["/posts/api/create", "/posts/api/discover", "/posts/api/user"],
            "analytics": ["/posts/api/stats", "/posts/api/top-posts", "/posts/api/engagement-by-date"],
            "users": ["/users/api/profile", "/users/api/followers", "/users/api/following"]
        }
    }))
}

async fn health_check() -> &'static str {
    "OK"
}
