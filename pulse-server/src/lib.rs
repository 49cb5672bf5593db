// Library exports for pulse-server
// The binary and the integration tests both build the app from these modules

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod routes;
pub mod seed;
pub mod state;
pub mod validation;

pub use routes::build_router;
pub use state::AppState;
