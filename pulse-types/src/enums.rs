use serde::{Deserialize, Serialize};

/// Result of toggling a binary relation (like, follow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    /// The relation row was absent and has been inserted
    Added,
    /// The relation row was present and has been deleted
    Removed,
}

impl ToggleOutcome {
    /// Whether the relation holds after the toggle
    pub fn is_on(&self) -> bool {
        matches!(self, ToggleOutcome::Added)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleOutcome::Added => "added",
            ToggleOutcome::Removed => "removed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "default" => Some(Environment::Development),
            "production" => Some(Environment::Production),
            _ => None,
        }
    }
}
