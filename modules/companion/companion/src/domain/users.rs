use std::sync::Arc;

use companion_sdk::{ProfilePatch, Role, User};
use tracing::{info, instrument};
use uuid::Uuid;

use super::ServiceConfig;
use super::error::DomainError;
use super::repo::{InterestRepository, UserRepository};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    interests: Arc<dyn InterestRepository>,
    config: ServiceConfig,
}

impl UserService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        interests: Arc<dyn InterestRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            users,
            interests,
            config,
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Applies the non-empty parts of `patch`. The role is never touched and a
    /// non-empty interest list replaces the stored set.
    #[instrument(skip(self, patch), fields(user_id = %id))]
    pub async fn update_profile(&self, id: Uuid, patch: ProfilePatch) -> Result<User, DomainError> {
        let mut user = self.get_by_id(id).await?;

        for (field, value) in [
            ("name", &patch.name),
            ("bio", &patch.bio),
            ("phone", &patch.phone),
            ("photo_url", &patch.photo_url),
        ] {
            self.config.check_text(field, value.as_deref())?;
        }

        if let Some(name) = non_empty(patch.name) {
            user.name = name;
        }
        if let Some(age) = patch.age.filter(|a| *a > 0) {
            user.age = Some(age);
        }
        if let Some(bio) = non_empty(patch.bio) {
            user.bio = Some(bio);
        }
        if let Some(phone) = non_empty(patch.phone) {
            user.phone = Some(phone);
        }
        if let Some(photo_url) = non_empty(patch.photo_url) {
            user.photo_url = Some(photo_url);
        }
        self.users.update(&user).await?;

        if let Some(ids) = patch.interest_ids.filter(|ids| !ids.is_empty()) {
            let known: Vec<Uuid> = self
                .interests
                .find_by_ids(&ids)
                .await?
                .into_iter()
                .map(|i| i.id)
                .collect();
            self.users.replace_interests(id, &known).await?;
        }

        info!("profile updated");
        self.get_by_id(id).await
    }

    /// Appends known interests; ones already declared are left alone.
    pub async fn add_interests(
        &self,
        id: Uuid,
        interest_ids: &[Uuid],
    ) -> Result<User, DomainError> {
        self.get_by_id(id).await?;
        let known: Vec<Uuid> = self
            .interests
            .find_by_ids(interest_ids)
            .await?
            .into_iter()
            .map(|i| i.id)
            .collect();
        self.users.append_interests(id, &known).await?;
        self.get_by_id(id).await
    }

    pub async fn remove_interest(&self, id: Uuid, interest_id: Uuid) -> Result<User, DomainError> {
        self.get_by_id(id).await?;
        self.users.remove_interest(id, interest_id).await?;
        self.get_by_id(id).await
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, DomainError> {
        Ok(self.users.find_by_role(role).await?)
    }

    /// Terminal: there is no reactivation.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn deactivate(&self, id: Uuid) -> Result<(), DomainError> {
        let mut user = self.get_by_id(id).await?;
        user.is_active = false;
        self.users.update(&user).await?;
        info!("account deactivated");
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
