//! `CompanionClientV1` trait definition.
//!
//! In-process consumers talk to the companion module through this trait.
//! Caller identity is passed as an already-authenticated user id.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CompanionError;
use crate::models::{
    Appointment, Connection, Interest, MatchSuggestion, NewAppointment, RoleFilter, User,
};

/// Public API trait for the companion module (Version 1).
#[async_trait]
pub trait CompanionClientV1: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> Result<User, CompanionError>;

    async fn list_interests(&self) -> Result<Vec<Interest>, CompanionError>;

    /// Ranked candidates the volunteer is not yet connected to.
    async fn suggestions(
        &self,
        volunteer_id: Uuid,
        filter: RoleFilter,
    ) -> Result<Vec<MatchSuggestion>, CompanionError>;

    async fn connect(
        &self,
        volunteer_id: Uuid,
        target_id: Uuid,
    ) -> Result<Connection, CompanionError>;

    async fn connections(&self, user_id: Uuid) -> Result<Vec<Connection>, CompanionError>;

    async fn invite(
        &self,
        volunteer_id: Uuid,
        invitation: NewAppointment,
    ) -> Result<Appointment, CompanionError>;

    async fn appointments(&self, user_id: Uuid) -> Result<Vec<Appointment>, CompanionError>;

    async fn upcoming(&self, user_id: Uuid) -> Result<Vec<Appointment>, CompanionError>;
}
