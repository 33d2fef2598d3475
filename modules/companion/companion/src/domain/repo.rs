//! Repository traits for the companion domain.

use async_trait::async_trait;
use companion_sdk::{
    Appointment, AppointmentStatus, Connection, ConnectionStatus, Interest, Role, User,
};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::DomainError;

/// Insert payload for a user account.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub role: Role,
    pub interest_ids: Vec<Uuid>,
}

/// A user together with the stored password hash. Only the auth service sees this.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewConnectionRecord {
    pub volunteer_id: Uuid,
    pub target_id: Uuid,
    pub target_role: Role,
    pub matched_interests: u32,
}

#[derive(Debug, Clone)]
pub struct NewAppointmentRecord {
    pub volunteer_id: Uuid,
    pub target_id: Uuid,
    pub target_role: Role,
    pub date: OffsetDateTime,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

/// User directory. Returned users always carry their interests.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<StoredCredentials>>;

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool>;

    async fn create(&self, record: NewUserRecord) -> anyhow::Result<User>;

    /// Persist scalar profile fields and the active flag.
    async fn update(&self, user: &User) -> anyhow::Result<()>;

    /// Active users only.
    async fn find_by_role(&self, role: Role) -> anyhow::Result<Vec<User>>;

    async fn replace_interests(&self, user_id: Uuid, interest_ids: &[Uuid]) -> anyhow::Result<()>;

    async fn append_interests(&self, user_id: Uuid, interest_ids: &[Uuid]) -> anyhow::Result<()>;

    async fn remove_interest(&self, user_id: Uuid, interest_id: Uuid) -> anyhow::Result<()>;
}

#[async_trait]
pub trait InterestRepository: Send + Sync {
    /// Ordered by name.
    async fn find_all(&self) -> anyhow::Result<Vec<Interest>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Interest>>;

    /// Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Interest>>;

    /// Inserts every `(name, icon)` whose name is not stored yet; returns the
    /// number of rows inserted.
    async fn seed_defaults(&self, defaults: &[(&str, &str)]) -> anyhow::Result<usize>;
}

#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Fails with [`DomainError::ConnectionAlreadyExists`] when the ordered
    /// pair is already stored.
    async fn create(&self, record: NewConnectionRecord) -> Result<Connection, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Connection>>;

    async fn find_by_volunteer(&self, volunteer_id: Uuid) -> anyhow::Result<Vec<Connection>>;

    async fn find_by_target(&self, target_id: Uuid) -> anyhow::Result<Vec<Connection>>;

    async fn exists(&self, volunteer_id: Uuid, target_id: Uuid) -> anyhow::Result<bool>;

    /// Compare-and-swap on `version`. Fails with `StaleRevision` when the row
    /// moved on, `NotFound` when it is gone.
    async fn update_status(
        &self,
        id: Uuid,
        expected_version: i32,
        status: ConnectionStatus,
    ) -> Result<(), DomainError>;
}

/// Appointment store. Returned appointments carry both participants.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, record: NewAppointmentRecord) -> anyhow::Result<Uuid>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>>;

    async fn find_by_volunteer(&self, volunteer_id: Uuid) -> anyhow::Result<Vec<Appointment>>;

    async fn find_by_target(&self, target_id: Uuid) -> anyhow::Result<Vec<Appointment>>;

    /// Confirmed appointments after `now` where the user is either participant.
    async fn find_upcoming(
        &self,
        user_id: Uuid,
        now: OffsetDateTime,
    ) -> anyhow::Result<Vec<Appointment>>;

    async fn find_pending_by_target(&self, target_id: Uuid) -> anyhow::Result<Vec<Appointment>>;

    async fn find_pending_by_volunteer(
        &self,
        volunteer_id: Uuid,
    ) -> anyhow::Result<Vec<Appointment>>;

    /// Full-record write guarded by `appointment.version`.
    async fn update(&self, appointment: &Appointment) -> Result<(), DomainError>;

    async fn update_status(
        &self,
        id: Uuid,
        expected_version: i32,
        status: AppointmentStatus,
    ) -> Result<(), DomainError>;
}
