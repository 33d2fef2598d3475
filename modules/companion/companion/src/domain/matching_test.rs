#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use companion_sdk::{ConnectionStatus, Role, RoleFilter};
    use uuid::Uuid;

    use crate::domain::error::DomainError;
    use crate::domain::matching::MatchingService;
    use crate::domain::test_support::InMemoryStore;

    fn service(store: &Arc<InMemoryStore>) -> MatchingService {
        MatchingService::new(store.clone(), store.clone())
    }

    #[tokio::test]
    async fn test_suggestions_ranked_by_score() {
        let store = InMemoryStore::new();
        let music = store.add_interest("Music");
        let chess = store.add_interest("Chess");
        let v = store.add_user("Vera", Role::Volunteer, &[music.clone(), chess.clone()]);
        let e1 = store.add_user("Edith", Role::Elderly, &[music.clone()]);
        let e2 = store.add_user("Ernest", Role::Elderly, &[music, chess]);

        let result = service(&store)
            .get_suggestions(v.id, RoleFilter::parse(""))
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].user.id, e2.id);
        assert_eq!(result[0].matched_interests, 2);
        assert!((result[0].match_score - 100.0).abs() < f64::EPSILON);
        assert_eq!(result[1].user.id, e1.id);
        assert_eq!(result[1].matched_interests, 1);
        assert!((result[1].match_score - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_suggestions_break_ties_by_id() {
        let store = InMemoryStore::new();
        let music = store.add_interest("Music");
        let v = store.add_user("Vera", Role::Volunteer, &[music.clone()]);
        let a = store.add_user("Anna", Role::Elderly, &[music.clone()]);
        let b = store.add_user("Home", Role::Institution, &[music]);

        let result = service(&store)
            .get_suggestions(v.id, RoleFilter::Any)
            .await
            .unwrap();

        let mut expected = vec![a.id, b.id];
        expected.sort();
        let got: Vec<Uuid> = result.iter().map(|s| s.user.id).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_suggestions_respect_role_filter() {
        let store = InMemoryStore::new();
        let v = store.add_user("Vera", Role::Volunteer, &[]);
        store.add_user("Edith", Role::Elderly, &[]);
        let home = store.add_user("Home", Role::Institution, &[]);

        let result = service(&store)
            .get_suggestions(v.id, RoleFilter::parse("institution"))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].user.id, home.id);
        assert!(result[0].match_score.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_suggestions_exclude_connected_candidates() {
        let store = InMemoryStore::new();
        let v = store.add_user("Vera", Role::Volunteer, &[]);
        let e1 = store.add_user("Edith", Role::Elderly, &[]);
        let e2 = store.add_user("Ernest", Role::Elderly, &[]);
        let svc = service(&store);

        svc.connect(v.id, e1.id).await.unwrap();
        let result = svc.get_suggestions(v.id, RoleFilter::Any).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].user.id, e2.id);
    }

    #[tokio::test]
    async fn test_suggestions_require_volunteer() {
        let store = InMemoryStore::new();
        let e = store.add_user("Edith", Role::Elderly, &[]);

        let err = service(&store)
            .get_suggestions(e.id, RoleFilter::Any)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotAVolunteer));
    }

    #[tokio::test]
    async fn test_connect_creates_pending_connection() {
        let store = InMemoryStore::new();
        let music = store.add_interest("Music");
        let chess = store.add_interest("Chess");
        let walking = store.add_interest("Walking");
        let v = store.add_user("Vera", Role::Volunteer, &[music.clone(), chess.clone()]);
        let e = store.add_user("Edith", Role::Elderly, &[music, chess, walking]);

        let conn = service(&store).connect(v.id, e.id).await.unwrap();

        assert_eq!(conn.status, ConnectionStatus::Pending);
        assert_eq!(conn.matched_interests, 2);
        assert_eq!(conn.target_role, Role::Elderly);
        assert_eq!(conn.target.map(|u| u.id), Some(e.id));
    }

    #[tokio::test]
    async fn test_connect_twice_conflicts() {
        let store = InMemoryStore::new();
        let v = store.add_user("Vera", Role::Volunteer, &[]);
        let e = store.add_user("Edith", Role::Elderly, &[]);
        let svc = service(&store);

        svc.connect(v.id, e.id).await.unwrap();
        let err = svc.connect(v.id, e.id).await.unwrap_err();

        assert!(matches!(err, DomainError::ConnectionAlreadyExists));
        assert_eq!(store.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_connect_volunteer_to_volunteer_is_invalid() {
        let store = InMemoryStore::new();
        let v1 = store.add_user("Vera", Role::Volunteer, &[]);
        let v2 = store.add_user("Victor", Role::Volunteer, &[]);

        let err = service(&store).connect(v1.id, v2.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTarget));
    }

    #[tokio::test]
    async fn test_connect_requires_volunteer_initiator() {
        let store = InMemoryStore::new();
        let e = store.add_user("Edith", Role::Elderly, &[]);
        let home = store.add_user("Home", Role::Institution, &[]);

        let err = service(&store).connect(e.id, home.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotAVolunteer));
    }

    #[tokio::test]
    async fn test_accept_and_reject_connection() {
        let store = InMemoryStore::new();
        let v = store.add_user("Vera", Role::Volunteer, &[]);
        let e1 = store.add_user("Edith", Role::Elderly, &[]);
        let e2 = store.add_user("Ernest", Role::Elderly, &[]);
        let svc = service(&store);

        let c1 = svc.connect(v.id, e1.id).await.unwrap();
        let c2 = svc.connect(v.id, e2.id).await.unwrap();

        let accepted = svc.accept_connection(c1.id, e1.id).await.unwrap();
        assert_eq!(accepted.status, ConnectionStatus::Accepted);
        assert_eq!(accepted.version, c1.version + 1);

        // No ownership check: a third party may decide too.
        let rejected = svc.reject_connection(c2.id, Uuid::new_v4()).await.unwrap();
        assert_eq!(rejected.status, ConnectionStatus::Rejected);
    }

    #[tokio::test]
    async fn test_accept_missing_connection_is_not_found() {
        let store = InMemoryStore::new();
        let err = service(&store)
            .accept_connection(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_connections_branches_on_role() {
        let store = InMemoryStore::new();
        let v = store.add_user("Vera", Role::Volunteer, &[]);
        let e = store.add_user("Edith", Role::Elderly, &[]);
        let other = store.add_user("Ernest", Role::Elderly, &[]);
        let svc = service(&store);
        svc.connect(v.id, e.id).await.unwrap();

        assert_eq!(svc.get_connections(v.id).await.unwrap().len(), 1);
        assert_eq!(svc.get_connections(e.id).await.unwrap().len(), 1);
        assert!(svc.get_connections(other.id).await.unwrap().is_empty());
    }
}
