//! Configuration for the companion module.

use serde::{Deserialize, Serialize};

/// Domain knobs for the companion module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CompanionConfig {
    /// Duration applied to invitations sent without a positive duration.
    pub default_duration_minutes: i32,
    /// Upper bound for free-text profile and appointment fields.
    pub max_text_field_length: usize,
    /// Insert the default interest catalogue at startup.
    pub seed_interests: bool,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: 30,
            max_text_field_length: 2000,
            seed_interests: true,
        }
    }
}

/// Token issuance settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_owned(),
            issuer: "companion".to_owned(),
            access_token_ttl_hours: 24,
            refresh_token_ttl_days: 7,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_token_ttl_hours", &self.access_token_ttl_hours)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .finish()
    }
}

impl AuthConfig {
    /// Copy safe to print or log.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            jwt_secret: "<redacted>".to_owned(),
            ..self.clone()
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://companion.db?mode=rwc".to_owned(),
            max_connections: 16,
        }
    }
}
