pub mod appointments;
pub mod auth;
pub mod error;
pub mod interests;
pub mod matching;
pub mod ports;
pub mod repo;
pub mod scoring;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod matching_test;
#[cfg(test)]
mod users_test;

use crate::config::CompanionConfig;
use self::error::DomainError;

/// Knobs shared by the services, extracted from module config.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_duration_minutes: i32,
    pub max_text_field_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&CompanionConfig::default())
    }
}

impl From<&CompanionConfig> for ServiceConfig {
    fn from(cfg: &CompanionConfig) -> Self {
        Self {
            default_duration_minutes: cfg.default_duration_minutes,
            max_text_field_length: cfg.max_text_field_length,
        }
    }
}

impl ServiceConfig {
    /// Rejects `value` when it is longer than `max_text_field_length` characters.
    pub fn check_text(&self, field: &str, value: Option<&str>) -> Result<(), DomainError> {
        match value {
            Some(v) if v.chars().count() > self.max_text_field_length => {
                Err(DomainError::validation(
                    field,
                    format!("must not exceed {} characters", self.max_text_field_length),
                ))
            }
            _ => Ok(()),
        }
    }
}
