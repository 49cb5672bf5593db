use crate::auth::TokenManager;
use crate::config::Settings;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: TokenManager,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenManager) -> Self {
        Self { db, tokens }
    }

    pub fn from_settings(db: Database, settings: &Settings) -> Self {
        let tokens = TokenManager::new(&settings.auth.jwt_secret, settings.auth.token_ttl_minutes);
        Self::new(db, tokens)
    }
}
