//! Matching orchestration and the connection life-cycle.

use std::cmp::Ordering;
use std::sync::Arc;

use companion_sdk::{Connection, ConnectionStatus, MatchSuggestion, Role, RoleFilter, User};
use tracing::{info, instrument};
use uuid::Uuid;

use super::error::DomainError;
use super::repo::{ConnectionRepository, NewConnectionRecord, UserRepository};
use super::scoring;

pub struct MatchingService {
    users: Arc<dyn UserRepository>,
    connections: Arc<dyn ConnectionRepository>,
}

impl MatchingService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { users, connections }
    }

    async fn load_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    async fn load_connection(&self, id: Uuid) -> Result<Connection, DomainError> {
        self.connections
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("connection", id))
    }

    /// Ranked candidates the volunteer is not yet connected to.
    ///
    /// Ordered by score descending, then candidate id ascending.
    #[instrument(skip(self), fields(volunteer_id = %volunteer_id))]
    pub async fn get_suggestions(
        &self,
        volunteer_id: Uuid,
        filter: RoleFilter,
    ) -> Result<Vec<MatchSuggestion>, DomainError> {
        let volunteer = self.load_user(volunteer_id).await?;
        if volunteer.role != Role::Volunteer {
            return Err(DomainError::NotAVolunteer);
        }
        let own = volunteer.interest_ids();

        let mut suggestions = Vec::new();
        for role in filter.roles() {
            for candidate in self.users.find_by_role(*role).await? {
                if self.connections.exists(volunteer_id, candidate.id).await? {
                    continue;
                }
                let result = scoring::score(&own, &candidate.interest_ids());
                suggestions.push(MatchSuggestion {
                    user: candidate,
                    matched_interests: result.matched,
                    match_score: result.score,
                });
            }
        }

        suggestions.sort_by(rank);
        tracing::debug!(count = suggestions.len(), "suggestions computed");
        Ok(suggestions)
    }

    #[instrument(skip(self), fields(volunteer_id = %volunteer_id, target_id = %target_id))]
    pub async fn connect(
        &self,
        volunteer_id: Uuid,
        target_id: Uuid,
    ) -> Result<Connection, DomainError> {
        if self.connections.exists(volunteer_id, target_id).await? {
            return Err(DomainError::ConnectionAlreadyExists);
        }

        let volunteer = self.load_user(volunteer_id).await?;
        if volunteer.role != Role::Volunteer {
            return Err(DomainError::NotAVolunteer);
        }

        let target = self.load_user(target_id).await?;
        if !target.role.is_target() {
            return Err(DomainError::InvalidTarget);
        }

        let matched = scoring::matched_count(&volunteer.interest_ids(), &target.interest_ids());
        let created = self
            .connections
            .create(NewConnectionRecord {
                volunteer_id,
                target_id,
                target_role: target.role,
                matched_interests: matched,
            })
            .await?;

        info!(connection_id = %created.id, matched, "connection requested");
        Ok(Connection {
            volunteer: Some(volunteer),
            target: Some(target),
            ..created
        })
    }

    /// Any caller may decide; the caller id is only recorded in the log.
    pub async fn accept_connection(
        &self,
        id: Uuid,
        caller_id: Uuid,
    ) -> Result<Connection, DomainError> {
        self.transition(id, caller_id, ConnectionStatus::Accepted)
            .await
    }

    pub async fn reject_connection(
        &self,
        id: Uuid,
        caller_id: Uuid,
    ) -> Result<Connection, DomainError> {
        self.transition(id, caller_id, ConnectionStatus::Rejected)
            .await
    }

    #[instrument(
        skip(self),
        fields(connection_id = %id, caller_id = %caller_id, status = status.as_str())
    )]
    async fn transition(
        &self,
        id: Uuid,
        caller_id: Uuid,
        status: ConnectionStatus,
    ) -> Result<Connection, DomainError> {
        let current = self.load_connection(id).await?;
        if current.target_id != caller_id {
            tracing::warn!(
                target_id = %current.target_id,
                "connection decided by a non-target caller"
            );
        }
        self.connections
            .update_status(id, current.version, status)
            .await?;
        info!("connection status changed");
        self.load_connection(id).await
    }

    /// Connections where the user is the volunteer (volunteers) or the target
    /// (everyone else).
    pub async fn get_connections(&self, user_id: Uuid) -> Result<Vec<Connection>, DomainError> {
        let user = self.load_user(user_id).await?;
        let found = if user.role == Role::Volunteer {
            self.connections.find_by_volunteer(user_id).await?
        } else {
            self.connections.find_by_target(user_id).await?
        };
        Ok(found)
    }

    pub async fn get_connection(&self, id: Uuid) -> Result<Connection, DomainError> {
        self.load_connection(id).await
    }
}

fn rank(a: &MatchSuggestion, b: &MatchSuggestion) -> Ordering {
    b.match_score
        .total_cmp(&a.match_score)
        .then_with(|| a.user.id.cmp(&b.user.id))
}
