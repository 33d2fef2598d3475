//! In-memory doubles for the repository traits and output ports.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use companion_sdk::{
    Appointment, AppointmentStatus, Connection, ConnectionStatus, Interest, Role, User,
};
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::error::DomainError;
use super::ports::{PasswordHasher, TokenIssuer, TokenKind, TokenSubject};
use super::repo::{
    AppointmentRepository, ConnectionRepository, InterestRepository, NewAppointmentRecord,
    NewConnectionRecord, NewUserRecord, StoredCredentials, UserRepository,
};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    hashes: HashMap<Uuid, String>,
    interests: HashMap<Uuid, Interest>,
    connections: HashMap<Uuid, Connection>,
    appointments: HashMap<Uuid, Appointment>,
}

/// One shared store backing every repository trait.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_interest(&self, name: &str) -> Interest {
        let interest = Interest {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            icon: String::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.state
            .lock()
            .interests
            .insert(interest.id, interest.clone());
        interest
    }

    pub fn add_user(&self, name: &str, role: Role, interests: &[Interest]) -> User {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            email: format!("{}@example.org", name.to_lowercase()),
            age: None,
            bio: None,
            phone: None,
            photo_url: None,
            role,
            is_active: true,
            interests: interests.to_vec(),
            created_at: now,
            updated_at: now,
        };
        self.state.lock().users.insert(user.id, user.clone());
        user
    }

    /// Stores an appointment directly, bypassing service checks.
    pub fn add_appointment(
        &self,
        volunteer: &User,
        target: &User,
        date: OffsetDateTime,
        status: AppointmentStatus,
    ) -> Appointment {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            volunteer_id: volunteer.id,
            target_id: target.id,
            target_role: target.role,
            date,
            duration_minutes: 30,
            status,
            meeting_url: None,
            notes: None,
            rating: None,
            version: 1,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
            volunteer: None,
            target: None,
        };
        self.state
            .lock()
            .appointments
            .insert(appointment.id, appointment.clone());
        appointment
    }

    pub fn bump_appointment_version(&self, id: Uuid) {
        if let Some(a) = self.state.lock().appointments.get_mut(&id) {
            a.version += 1;
        }
    }

    pub fn connection_count(&self) -> usize {
        self.state.lock().connections.len()
    }

    fn hydrate_appointment(state: &State, mut a: Appointment) -> Appointment {
        a.volunteer = state.users.get(&a.volunteer_id).cloned();
        a.target = state.users.get(&a.target_id).cloned();
        a
    }

    fn hydrate_connection(state: &State, mut c: Connection) -> Connection {
        c.volunteer = state.users.get(&c.volunteer_id).cloned();
        c.target = state.users.get(&c.target_id).cloned();
        c
    }

    fn appointments_where(&self, pred: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        let state = self.state.lock();
        let mut found: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| pred(a))
            .cloned()
            .map(|a| Self::hydrate_appointment(&state, a))
            .collect();
        found.sort_by_key(|a| a.date);
        found
    }

    fn connections_where(&self, pred: impl Fn(&Connection) -> bool) -> Vec<Connection> {
        let state = self.state.lock();
        state
            .connections
            .values()
            .filter(|c| pred(c))
            .cloned()
            .map(|c| Self::hydrate_connection(&state, c))
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.state.lock().users.get(&id).cloned())
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<StoredCredentials>> {
        let state = self.state.lock();
        Ok(state
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| StoredCredentials {
                user: u.clone(),
                password_hash: state.hashes.get(&u.id).cloned().unwrap_or_default(),
            }))
    }

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        Ok(self.state.lock().users.values().any(|u| u.email == email))
    }

    async fn create(&self, record: NewUserRecord) -> anyhow::Result<User> {
        let mut state = self.state.lock();
        let interests = record
            .interest_ids
            .iter()
            .filter_map(|id| state.interests.get(id).cloned())
            .collect();
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: record.name,
            email: record.email,
            age: record.age,
            bio: record.bio,
            phone: None,
            photo_url: None,
            role: record.role,
            is_active: true,
            interests,
            created_at: now,
            updated_at: now,
        };
        state.hashes.insert(user.id, record.password_hash);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> anyhow::Result<()> {
        let mut state = self.state.lock();
        let stored = state
            .users
            .get_mut(&user.id)
            .ok_or_else(|| anyhow::anyhow!("user {} missing", user.id))?;
        let interests = std::mem::take(&mut stored.interests);
        let role = stored.role;
        *stored = User {
            interests,
            role,
            ..user.clone()
        };
        Ok(())
    }

    async fn find_by_role(&self, role: Role) -> anyhow::Result<Vec<User>> {
        Ok(self
            .state
            .lock()
            .users
            .values()
            .filter(|u| u.role == role && u.is_active)
            .cloned()
            .collect())
    }

    async fn replace_interests(&self, user_id: Uuid, interest_ids: &[Uuid]) -> anyhow::Result<()> {
        let mut state = self.state.lock();
        let interests: Vec<Interest> = interest_ids
            .iter()
            .filter_map(|id| state.interests.get(id).cloned())
            .collect();
        if let Some(u) = state.users.get_mut(&user_id) {
            u.interests = interests;
        }
        Ok(())
    }

    async fn append_interests(&self, user_id: Uuid, interest_ids: &[Uuid]) -> anyhow::Result<()> {
        let mut state = self.state.lock();
        let extra: Vec<Interest> = interest_ids
            .iter()
            .filter_map(|id| state.interests.get(id).cloned())
            .collect();
        if let Some(u) = state.users.get_mut(&user_id) {
            for interest in extra {
                if !u.interests.iter().any(|i| i.id == interest.id) {
                    u.interests.push(interest);
                }
            }
        }
        Ok(())
    }

    async fn remove_interest(&self, user_id: Uuid, interest_id: Uuid) -> anyhow::Result<()> {
        if let Some(u) = self.state.lock().users.get_mut(&user_id) {
            u.interests.retain(|i| i.id != interest_id);
        }
        Ok(())
    }
}

#[async_trait]
impl InterestRepository for InMemoryStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Interest>> {
        let mut all: Vec<Interest> = self.state.lock().interests.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Interest>> {
        Ok(self.state.lock().interests.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Interest>> {
        let state = self.state.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.interests.get(id).cloned())
            .collect())
    }

    async fn seed_defaults(&self, defaults: &[(&str, &str)]) -> anyhow::Result<usize> {
        let mut inserted = 0;
        for (name, icon) in defaults {
            let exists = self
                .state
                .lock()
                .interests
                .values()
                .any(|i| i.name == *name);
            if !exists {
                let mut interest = self.add_interest(name);
                interest.icon = (*icon).to_owned();
                self.state.lock().interests.insert(interest.id, interest);
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryStore {
    async fn create(&self, record: NewConnectionRecord) -> Result<Connection, DomainError> {
        let mut state = self.state.lock();
        if state
            .connections
            .values()
            .any(|c| c.volunteer_id == record.volunteer_id && c.target_id == record.target_id)
        {
            return Err(DomainError::ConnectionAlreadyExists);
        }
        let now = OffsetDateTime::now_utc();
        let connection = Connection {
            id: Uuid::new_v4(),
            volunteer_id: record.volunteer_id,
            target_id: record.target_id,
            target_role: record.target_role,
            status: ConnectionStatus::Pending,
            matched_interests: record.matched_interests,
            version: 1,
            created_at: now,
            updated_at: now,
            volunteer: None,
            target: None,
        };
        state.connections.insert(connection.id, connection.clone());
        Ok(connection)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Connection>> {
        let state = self.state.lock();
        Ok(state
            .connections
            .get(&id)
            .cloned()
            .map(|c| Self::hydrate_connection(&state, c)))
    }

    async fn find_by_volunteer(&self, volunteer_id: Uuid) -> anyhow::Result<Vec<Connection>> {
        Ok(self.connections_where(|c| c.volunteer_id == volunteer_id))
    }

    async fn find_by_target(&self, target_id: Uuid) -> anyhow::Result<Vec<Connection>> {
        Ok(self.connections_where(|c| c.target_id == target_id))
    }

    async fn exists(&self, volunteer_id: Uuid, target_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .state
            .lock()
            .connections
            .values()
            .any(|c| c.volunteer_id == volunteer_id && c.target_id == target_id))
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected_version: i32,
        status: ConnectionStatus,
    ) -> Result<(), DomainError> {
        let mut state = self.state.lock();
        let c = state
            .connections
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("connection", id))?;
        if c.version != expected_version {
            return Err(DomainError::stale("connection", id));
        }
        c.status = status;
        c.version += 1;
        Ok(())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn create(&self, record: NewAppointmentRecord) -> anyhow::Result<Uuid> {
        let now = OffsetDateTime::now_utc();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            volunteer_id: record.volunteer_id,
            target_id: record.target_id,
            target_role: record.target_role,
            date: record.date,
            duration_minutes: record.duration_minutes,
            status: AppointmentStatus::Pending,
            meeting_url: None,
            notes: record.notes,
            rating: None,
            version: 1,
            created_at: now,
            updated_at: now,
            volunteer: None,
            target: None,
        };
        let id = appointment.id;
        self.state.lock().appointments.insert(id, appointment);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>> {
        let state = self.state.lock();
        Ok(state
            .appointments
            .get(&id)
            .cloned()
            .map(|a| Self::hydrate_appointment(&state, a)))
    }

    async fn find_by_volunteer(&self, volunteer_id: Uuid) -> anyhow::Result<Vec<Appointment>> {
        Ok(self.appointments_where(|a| a.volunteer_id == volunteer_id))
    }

    async fn find_by_target(&self, target_id: Uuid) -> anyhow::Result<Vec<Appointment>> {
        Ok(self.appointments_where(|a| a.target_id == target_id))
    }

    async fn find_upcoming(
        &self,
        user_id: Uuid,
        now: OffsetDateTime,
    ) -> anyhow::Result<Vec<Appointment>> {
        Ok(self.appointments_where(|a| {
            a.is_participant(user_id) && a.date > now && a.status == AppointmentStatus::Confirmed
        }))
    }

    async fn find_pending_by_target(&self, target_id: Uuid) -> anyhow::Result<Vec<Appointment>> {
        Ok(self.appointments_where(|a| {
            a.target_id == target_id && a.status == AppointmentStatus::Pending
        }))
    }

    async fn find_pending_by_volunteer(
        &self,
        volunteer_id: Uuid,
    ) -> anyhow::Result<Vec<Appointment>> {
        Ok(self.appointments_where(|a| {
            a.volunteer_id == volunteer_id && a.status == AppointmentStatus::Pending
        }))
    }

    async fn update(&self, appointment: &Appointment) -> Result<(), DomainError> {
        let mut state = self.state.lock();
        let stored = state
            .appointments
            .get_mut(&appointment.id)
            .ok_or_else(|| DomainError::not_found("appointment", appointment.id))?;
        if stored.version != appointment.version {
            return Err(DomainError::stale("appointment", appointment.id));
        }
        *stored = Appointment {
            version: appointment.version + 1,
            volunteer: None,
            target: None,
            ..appointment.clone()
        };
        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected_version: i32,
        status: AppointmentStatus,
    ) -> Result<(), DomainError> {
        let mut state = self.state.lock();
        let a = state
            .appointments
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("appointment", id))?;
        if a.version != expected_version {
            return Err(DomainError::stale("appointment", id));
        }
        a.status = status;
        a.version += 1;
        Ok(())
    }
}

/// Reversible "hash" so tests can assert on stored values.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> anyhow::Result<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> anyhow::Result<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

/// Tokens of the form `kind|user_id|role|email`.
pub struct PlainTokens;

impl TokenIssuer for PlainTokens {
    fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> Result<String, DomainError> {
        Ok(format!(
            "{}|{}|{}|{}",
            kind.as_str(),
            subject.user_id,
            subject.role,
            subject.email
        ))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenSubject, DomainError> {
        let parts: Vec<&str> = token.splitn(4, '|').collect();
        let [k, id, role, email] = parts.as_slice() else {
            return Err(DomainError::InvalidToken);
        };
        if *k != kind.as_str() {
            return Err(DomainError::InvalidToken);
        }
        Ok(TokenSubject {
            user_id: id.parse().map_err(|_| DomainError::InvalidToken)?,
            role: role.parse().map_err(|_| DomainError::InvalidToken)?,
            email: (*email).to_owned(),
        })
    }
}

pub fn in_one_hour() -> OffsetDateTime {
    OffsetDateTime::now_utc() + Duration::hours(1)
}

pub fn one_hour_ago() -> OffsetDateTime {
    OffsetDateTime::now_utc() - Duration::hours(1)
}
