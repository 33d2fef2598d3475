//! In-process adapter implementing the SDK client trait on top of the services.

use async_trait::async_trait;
use companion_sdk::{
    Appointment, CompanionClientV1, CompanionError, Connection, Interest, MatchSuggestion,
    NewAppointment, RoleFilter, User,
};
use uuid::Uuid;

use crate::module::Services;

pub struct CompanionLocalClient {
    services: Services,
}

impl CompanionLocalClient {
    #[must_use]
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CompanionClientV1 for CompanionLocalClient {
    async fn get_user(&self, user_id: Uuid) -> Result<User, CompanionError> {
        self.services
            .users
            .get_by_id(user_id)
            .await
            .map_err(Into::into)
    }

    async fn list_interests(&self) -> Result<Vec<Interest>, CompanionError> {
        self.services.interests.get_all().await.map_err(Into::into)
    }

    async fn suggestions(
        &self,
        volunteer_id: Uuid,
        filter: RoleFilter,
    ) -> Result<Vec<MatchSuggestion>, CompanionError> {
        self.services
            .matching
            .get_suggestions(volunteer_id, filter)
            .await
            .map_err(Into::into)
    }

    async fn connect(
        &self,
        volunteer_id: Uuid,
        target_id: Uuid,
    ) -> Result<Connection, CompanionError> {
        self.services
            .matching
            .connect(volunteer_id, target_id)
            .await
            .map_err(Into::into)
    }

    async fn connections(&self, user_id: Uuid) -> Result<Vec<Connection>, CompanionError> {
        self.services
            .matching
            .get_connections(user_id)
            .await
            .map_err(Into::into)
    }

    async fn invite(
        &self,
        volunteer_id: Uuid,
        invitation: NewAppointment,
    ) -> Result<Appointment, CompanionError> {
        self.services
            .appointments
            .create(volunteer_id, invitation)
            .await
            .map_err(Into::into)
    }

    async fn appointments(&self, user_id: Uuid) -> Result<Vec<Appointment>, CompanionError> {
        self.services
            .appointments
            .get_my_appointments(user_id)
            .await
            .map_err(Into::into)
    }

    async fn upcoming(&self, user_id: Uuid) -> Result<Vec<Appointment>, CompanionError> {
        self.services
            .appointments
            .get_upcoming(user_id)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use companion_sdk::Role;

    use super::*;
    use crate::domain::ServiceConfig;
    use crate::domain::test_support::{InMemoryStore, PlainHasher, PlainTokens, in_one_hour};

    fn client(store: &Arc<InMemoryStore>) -> CompanionLocalClient {
        CompanionLocalClient::new(Services::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(PlainHasher),
            Arc::new(PlainTokens),
            &ServiceConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_errors_map_to_sdk_errors() {
        let store = InMemoryStore::new();
        let client = client(&store);

        let err = client.get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CompanionError::NotFound(_)));

        let olga = store.add_user("Olga", Role::Elderly, &[]);
        let err = client.connect(olga.id, olga.id).await.unwrap_err();
        assert!(matches!(err, CompanionError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_invite_and_list() {
        let store = InMemoryStore::new();
        let client = client(&store);
        let vera = store.add_user("Vera", Role::Volunteer, &[]);
        let olga = store.add_user("Olga", Role::Elderly, &[]);

        let appointment = client
            .invite(
                vera.id,
                NewAppointment {
                    target_id: olga.id,
                    date: in_one_hour(),
                    duration_minutes: 0,
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(appointment.duration_minutes, 30);

        let mine = client.appointments(olga.id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(client.upcoming(olga.id).await.unwrap().is_empty());
    }
}
