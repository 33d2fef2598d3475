//! Entity to domain model mappers.

use companion_sdk::{
    Appointment, AppointmentStatus, Connection, ConnectionStatus, Interest, Role, User,
};

use super::entity::enums::{DbAppointmentStatus, DbConnectionStatus, DbRole};
use super::entity::{appointment, connection, interest, user};

impl From<Role> for DbRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Volunteer => Self::Volunteer,
            Role::Elderly => Self::Elderly,
            Role::Institution => Self::Institution,
        }
    }
}

impl From<DbRole> for Role {
    fn from(role: DbRole) -> Self {
        match role {
            DbRole::Volunteer => Self::Volunteer,
            DbRole::Elderly => Self::Elderly,
            DbRole::Institution => Self::Institution,
        }
    }
}

impl From<ConnectionStatus> for DbConnectionStatus {
    fn from(status: ConnectionStatus) -> Self {
        match status {
            ConnectionStatus::Pending => Self::Pending,
            ConnectionStatus::Accepted => Self::Accepted,
            ConnectionStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<DbConnectionStatus> for ConnectionStatus {
    fn from(status: DbConnectionStatus) -> Self {
        match status {
            DbConnectionStatus::Pending => Self::Pending,
            DbConnectionStatus::Accepted => Self::Accepted,
            DbConnectionStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<AppointmentStatus> for DbAppointmentStatus {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Pending => Self::Pending,
            AppointmentStatus::Confirmed => Self::Confirmed,
            AppointmentStatus::Cancelled => Self::Cancelled,
            AppointmentStatus::Completed => Self::Completed,
        }
    }
}

impl From<DbAppointmentStatus> for AppointmentStatus {
    fn from(status: DbAppointmentStatus) -> Self {
        match status {
            DbAppointmentStatus::Pending => Self::Pending,
            DbAppointmentStatus::Confirmed => Self::Confirmed,
            DbAppointmentStatus::Cancelled => Self::Cancelled,
            DbAppointmentStatus::Completed => Self::Completed,
        }
    }
}

impl From<interest::Model> for Interest {
    fn from(model: interest::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            icon: model.icon,
            created_at: model.created_at,
        }
    }
}

/// Convert a user row plus its interests to the domain model.
pub fn user_with_interests(model: user::Model, interests: Vec<Interest>) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        age: model.age,
        bio: model.bio,
        phone: model.phone,
        photo_url: model.photo_url,
        role: model.role.into(),
        is_active: model.is_active,
        interests,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Participants are attached by the repository.
impl From<connection::Model> for Connection {
    fn from(model: connection::Model) -> Self {
        Self {
            id: model.id,
            volunteer_id: model.volunteer_id,
            target_id: model.target_id,
            target_role: model.target_role.into(),
            status: model.status.into(),
            matched_interests: u32::try_from(model.matched_interests).unwrap_or(0),
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
            volunteer: None,
            target: None,
        }
    }
}

impl From<appointment::Model> for Appointment {
    fn from(model: appointment::Model) -> Self {
        Self {
            id: model.id,
            volunteer_id: model.volunteer_id,
            target_id: model.target_id,
            target_role: model.target_role.into(),
            date: model.date,
            duration_minutes: model.duration_minutes,
            status: model.status.into(),
            meeting_url: model.meeting_url,
            notes: model.notes,
            rating: model.rating.and_then(|r| u8::try_from(r).ok()),
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
            volunteer: None,
            target: None,
        }
    }
}
