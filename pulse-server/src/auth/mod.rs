//! Password hashing, access tokens and the authenticated-user extractor.

mod extract;
mod password;
mod token;

pub use extract::AuthUser;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenManager};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Token subject is not a user id")]
    InvalidSubject,

    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Failed to issue token: {0}")]
    Issuing(String),
}
