//! Appointment scheduling and its state machine.
//!
//! ```text
//! Pending --accept--> Confirmed --complete--> Completed
//!    |                    |
//!    +--decline/cancel----+--cancel--> Cancelled
//! ```
//!
//! Decline, cancel and complete do not look at the current status.

use std::sync::Arc;

use companion_sdk::{Appointment, AppointmentStatus, NewAppointment, Role, User};
use time::{OffsetDateTime, UtcOffset};
use tracing::{info, instrument};
use uuid::Uuid;

use super::error::DomainError;
use super::repo::{AppointmentRepository, NewAppointmentRecord, UserRepository};
use super::ServiceConfig;

pub struct AppointmentService {
    users: Arc<dyn UserRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    config: ServiceConfig,
}

impl AppointmentService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            users,
            appointments,
            config,
        }
    }

    async fn load_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    async fn load(&self, id: Uuid) -> Result<Appointment, DomainError> {
        self.appointments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("appointment", id))
    }

    /// Invitation from a volunteer. Returns the stored appointment with both
    /// participants loaded.
    #[instrument(skip(self, req), fields(volunteer_id = %volunteer_id, target_id = %req.target_id))]
    pub async fn create(
        &self,
        volunteer_id: Uuid,
        req: NewAppointment,
    ) -> Result<Appointment, DomainError> {
        let volunteer = self.load_user(volunteer_id).await?;
        if volunteer.role != Role::Volunteer {
            return Err(DomainError::NotAVolunteer);
        }

        let target = self.load_user(req.target_id).await?;
        if !target.role.is_target() {
            return Err(DomainError::InvalidTarget);
        }

        if req.date <= OffsetDateTime::now_utc() {
            return Err(DomainError::PastDate);
        }
        self.config.check_text("notes", req.notes.as_deref())?;

        let duration_minutes = if req.duration_minutes > 0 {
            req.duration_minutes
        } else {
            self.config.default_duration_minutes
        };

        let id = self
            .appointments
            .create(NewAppointmentRecord {
                volunteer_id,
                target_id: target.id,
                target_role: target.role,
                date: req.date.to_offset(UtcOffset::UTC),
                duration_minutes,
                notes: req.notes,
            })
            .await?;

        info!(appointment_id = %id, duration_minutes, "invitation sent");
        self.load(id).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Appointment, DomainError> {
        self.load(id).await
    }

    /// Pending -> Confirmed, target only.
    #[instrument(skip(self), fields(appointment_id = %id, caller_id = %caller_id))]
    pub async fn accept(&self, id: Uuid, caller_id: Uuid) -> Result<Appointment, DomainError> {
        let current = self.load(id).await?;
        if current.target_id != caller_id {
            return Err(DomainError::NotTarget);
        }
        if current.status != AppointmentStatus::Pending {
            return Err(DomainError::NotPending);
        }
        self.set_status(&current, AppointmentStatus::Confirmed)
            .await
    }

    /// Target only, from any status.
    #[instrument(skip(self), fields(appointment_id = %id, caller_id = %caller_id))]
    pub async fn decline(&self, id: Uuid, caller_id: Uuid) -> Result<Appointment, DomainError> {
        let current = self.load(id).await?;
        if current.target_id != caller_id {
            return Err(DomainError::NotTarget);
        }
        self.set_status(&current, AppointmentStatus::Cancelled)
            .await
    }

    /// Either participant, from any status.
    #[instrument(skip(self), fields(appointment_id = %id, caller_id = %caller_id))]
    pub async fn cancel(&self, id: Uuid, caller_id: Uuid) -> Result<Appointment, DomainError> {
        let current = self.load(id).await?;
        if !current.is_participant(caller_id) {
            return Err(DomainError::NotParticipant);
        }
        self.set_status(&current, AppointmentStatus::Cancelled)
            .await
    }

    /// Marks the appointment completed. A rating outside `1..=5` is ignored.
    #[instrument(skip(self), fields(appointment_id = %id))]
    pub async fn complete(
        &self,
        id: Uuid,
        rating: Option<i32>,
    ) -> Result<Appointment, DomainError> {
        let mut appointment = self.load(id).await?;
        appointment.status = AppointmentStatus::Completed;
        if let Some(r) = rating
            .and_then(|r| u8::try_from(r).ok())
            .filter(|r| (1..=5).contains(r))
        {
            appointment.rating = Some(r);
        }
        self.appointments.update(&appointment).await?;
        info!(rating = ?appointment.rating, "appointment completed");
        self.load(id).await
    }

    #[instrument(skip(self, url), fields(appointment_id = %id))]
    pub async fn set_meeting_url(&self, id: Uuid, url: String) -> Result<Appointment, DomainError> {
        self.config.check_text("meeting_url", Some(&url))?;
        let mut appointment = self.load(id).await?;
        appointment.meeting_url = Some(url);
        self.appointments.update(&appointment).await?;
        self.load(id).await
    }

    async fn set_status(
        &self,
        current: &Appointment,
        status: AppointmentStatus,
    ) -> Result<Appointment, DomainError> {
        self.appointments
            .update_status(current.id, current.version, status)
            .await?;
        info!(from = current.status.as_str(), to = status.as_str(), "appointment status changed");
        self.load(current.id).await
    }

    /// Appointments where the user is the volunteer (volunteers) or the
    /// target (everyone else), oldest date first.
    pub async fn get_my_appointments(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Appointment>, DomainError> {
        let user = self.load_user(user_id).await?;
        let found = if user.role == Role::Volunteer {
            self.appointments.find_by_volunteer(user_id).await?
        } else {
            self.appointments.find_by_target(user_id).await?
        };
        Ok(found)
    }

    pub async fn get_upcoming(&self, user_id: Uuid) -> Result<Vec<Appointment>, DomainError> {
        Ok(self
            .appointments
            .find_upcoming(user_id, OffsetDateTime::now_utc())
            .await?)
    }

    pub async fn get_received_invitations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Appointment>, DomainError> {
        Ok(self.appointments.find_pending_by_target(user_id).await?)
    }

    pub async fn get_sent_invitations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Appointment>, DomainError> {
        Ok(self.appointments.find_pending_by_volunteer(user_id).await?)
    }
}
