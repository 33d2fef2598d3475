#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use companion_sdk::{ProfilePatch, Role};
    use uuid::Uuid;

    use crate::domain::ServiceConfig;
    use crate::domain::error::DomainError;
    use crate::domain::interests::{DEFAULT_INTERESTS, InterestService};
    use crate::domain::test_support::InMemoryStore;
    use crate::domain::users::UserService;

    fn service(store: &Arc<InMemoryStore>) -> UserService {
        UserService::new(store.clone(), store.clone(), ServiceConfig::default())
    }

    #[tokio::test]
    async fn test_update_profile_only_overwrites_non_empty_fields() {
        let store = InMemoryStore::new();
        let music = store.add_interest("Music");
        let chess = store.add_interest("Chess");
        let user = store.add_user("Edith", Role::Elderly, &[music]);

        let updated = service(&store)
            .update_profile(
                user.id,
                ProfilePatch {
                    name: Some(String::new()),
                    age: Some(0),
                    bio: Some("Retired nurse".to_owned()),
                    interest_ids: Some(vec![chess.id, Uuid::new_v4()]),
                    ..ProfilePatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Edith");
        assert_eq!(updated.age, None);
        assert_eq!(updated.bio.as_deref(), Some("Retired nurse"));
        assert_eq!(updated.role, Role::Elderly);
        assert_eq!(updated.interest_ids(), vec![chess.id]);
    }

    #[tokio::test]
    async fn test_empty_interest_list_keeps_existing() {
        let store = InMemoryStore::new();
        let music = store.add_interest("Music");
        let user = store.add_user("Edith", Role::Elderly, &[music.clone()]);

        let updated = service(&store)
            .update_profile(
                user.id,
                ProfilePatch {
                    age: Some(81),
                    interest_ids: Some(Vec::new()),
                    ..ProfilePatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.age, Some(81));
        assert_eq!(updated.interest_ids(), vec![music.id]);
    }

    #[tokio::test]
    async fn test_update_profile_validates_length() {
        let store = InMemoryStore::new();
        let user = store.add_user("Edith", Role::Elderly, &[]);
        let svc = UserService::new(
            store.clone(),
            store.clone(),
            ServiceConfig {
                default_duration_minutes: 30,
                max_text_field_length: 10,
            },
        );

        let err = svc
            .update_profile(
                user.id,
                ProfilePatch {
                    bio: Some("a".repeat(11)),
                    ..ProfilePatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_add_and_remove_interests() {
        let store = InMemoryStore::new();
        let music = store.add_interest("Music");
        let chess = store.add_interest("Chess");
        let user = store.add_user("Vera", Role::Volunteer, &[music.clone()]);
        let svc = service(&store);

        let added = svc.add_interests(user.id, &[music.id, chess.id]).await.unwrap();
        assert_eq!(added.interests.len(), 2);

        let removed = svc.remove_interest(user.id, music.id).await.unwrap();
        assert_eq!(removed.interest_ids(), vec![chess.id]);
    }

    #[tokio::test]
    async fn test_deactivate_hides_user_from_role_listing() {
        let store = InMemoryStore::new();
        let user = store.add_user("Edith", Role::Elderly, &[]);
        store.add_user("Ernest", Role::Elderly, &[]);
        let svc = service(&store);

        svc.deactivate(user.id).await.unwrap();

        assert!(!svc.get_by_id(user.id).await.unwrap().is_active);
        let listed = svc.list_by_role(Role::Elderly).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_ne!(listed[0].id, user.id);
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let store = InMemoryStore::new();
        let err = service(&store).get_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_seed_defaults_is_idempotent() {
        let store = InMemoryStore::new();
        store.add_interest("Music");
        let svc = InterestService::new(store.clone());

        let first = svc.seed_defaults().await.unwrap();
        let second = svc.seed_defaults().await.unwrap();

        assert_eq!(first, DEFAULT_INTERESTS.len() - 1);
        assert_eq!(second, 0);

        let all = svc.get_all().await.unwrap();
        assert_eq!(all.len(), DEFAULT_INTERESTS.len());
        assert!(all.windows(2).all(|w| w[0].name <= w[1].name));
    }
}
