use std::sync::Arc;

use companion_sdk::Interest;
use uuid::Uuid;

use super::error::DomainError;
use super::repo::InterestRepository;

/// Catalogue inserted on startup, keyed by name.
pub const DEFAULT_INTERESTS: &[(&str, &str)] = &[
    ("Musical instruments", "🎸"),
    ("Board games", "🎲"),
    ("Walking", "🚶"),
    ("Reading", "📚"),
    ("Crosswords", "✏️"),
    ("Music", "🎵"),
    ("Chess", "♟️"),
    ("Gardening", "🌱"),
    ("Handicrafts", "🎨"),
    ("Group conversation", "💬"),
];

pub struct InterestService {
    repo: Arc<dyn InterestRepository>,
}

impl InterestService {
    #[must_use]
    pub fn new(repo: Arc<dyn InterestRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Vec<Interest>, DomainError> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Interest, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("interest", id))
    }

    /// Idempotent. Returns how many interests were added.
    pub async fn seed_defaults(&self) -> Result<usize, DomainError> {
        let inserted = self.repo.seed_defaults(DEFAULT_INTERESTS).await?;
        if inserted > 0 {
            tracing::info!(inserted, "default interests seeded");
        }
        Ok(inserted)
    }
}
