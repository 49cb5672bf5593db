use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

use pulse_types::Environment;

/// Signing secret used when none is configured; refused in production
pub const DEV_JWT_SECRET: &str = "pulse-development-secret-change-me";

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub path: String,
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
    pub environment: Environment,
}

/// Environment variables and the settings keys they override
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("DATABASE_PATH", "database.path"),
    ("SEED_DEMO_DATA", "database.seed_demo_data"),
    ("JWT_SECRET", "auth.jwt_secret"),
    ("TOKEN_TTL_MINUTES", "auth.token_ttl_minutes"),
    ("PULSE_ENV", "environment"),
];

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Build settings from defaults, an optional `settings.toml` and `lookup`
    /// for environment overrides (highest priority).
    pub fn load<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.path", "pulse.db")?
            .set_default("database.seed_demo_data", false)?
            .set_default("auth.jwt_secret", DEV_JWT_SECRET)?
            .set_default("auth.token_ttl_minutes", 15)?
            .set_default("environment", "development")?;

        let config_file_name = "settings.toml";
        for path in [
            PathBuf::from(config_file_name),
            PathBuf::from("pulse-server").join(config_file_name),
        ] {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        for &(var, key) in ENV_OVERRIDES {
            if let Some(value) = lookup(var) {
                let value = if key == "environment" {
                    Environment::parse(&value)
                        .map(|env| env.as_str().to_string())
                        .ok_or_else(|| ConfigError::Message(format!("Unknown environment: {}", value)))?
                } else {
                    value
                };
                builder = builder.set_override(key, value)?;
            }
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.environment == Environment::Production && self.auth.jwt_secret == DEV_JWT_SECRET {
            return Err(ConfigError::Message(
                "JWT_SECRET must be set in production".to_string(),
            ));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Message("JWT secret must not be empty".to_string()));
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(ConfigError::Message(
                "Token TTL must be a positive number of minutes".to_string(),
            ));
        }
        Ok(())
    }
}
