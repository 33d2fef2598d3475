//! Public models for the companion module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the companion module and its consumers. Wire formats live in the
//! module's REST layer, storage formats in its infra layer.

use std::fmt;
use std::str::FromStr;

use time::OffsetDateTime;
use uuid::Uuid;

/// Account role. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Volunteer,
    Elderly,
    Institution,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Volunteer => "VOLUNTEER",
            Self::Elderly => "ELDERLY",
            Self::Institution => "INSTITUTION",
        }
    }

    /// Elderly people and institutions are the receiving side of
    /// connections and appointments.
    #[must_use]
    pub const fn is_target(self) -> bool {
        matches!(self, Self::Elderly | Self::Institution)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VOLUNTEER" => Ok(Self::Volunteer),
            "ELDERLY" => Ok(Self::Elderly),
            "INSTITUTION" => Ok(Self::Institution),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}

/// Filter accepted by the suggestion query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    Elderly,
    Institution,
    #[default]
    Any,
}

impl RoleFilter {
    /// `"elderly"` and `"institution"` select a single role; anything else,
    /// including an empty string, selects both target roles.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "elderly" => Self::Elderly,
            "institution" => Self::Institution,
            _ => Self::Any,
        }
    }

    #[must_use]
    pub const fn roles(self) -> &'static [Role] {
        match self {
            Self::Elderly => &[Role::Elderly],
            Self::Institution => &[Role::Institution],
            Self::Any => &[Role::Elderly, Role::Institution],
        }
    }
}

/// A named interest tag. Reference data, seeded at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub created_at: OffsetDateTime,
}

/// User account with its declared interests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub interests: Vec<Interest>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    #[must_use]
    pub fn interest_ids(&self) -> Vec<Uuid> {
        self.interests.iter().map(|i| i.id).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// A volunteer's standing pairing request toward an elderly person or an
/// institution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub target_id: Uuid,
    /// Snapshot of the target's role at creation time.
    pub target_role: Role,
    pub status: ConnectionStatus,
    /// Shared interest count, frozen at creation time.
    pub matched_interests: u32,
    pub version: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub volunteer: Option<User>,
    pub target: Option<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

/// A scheduled conversation between a volunteer and a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub target_id: Uuid,
    /// Snapshot of the target's role at creation time.
    pub target_role: Role,
    pub date: OffsetDateTime,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub meeting_url: Option<String>,
    pub notes: Option<String>,
    /// 1..=5, only ever set on completion.
    pub rating: Option<u8>,
    pub version: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub volunteer: Option<User>,
    pub target: Option<User>,
}

impl Appointment {
    #[must_use]
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.volunteer_id == user_id || self.target_id == user_id
    }
}

/// Invitation sent by a volunteer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub target_id: Uuid,
    pub date: OffsetDateTime,
    /// Values `<= 0` fall back to the configured default.
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

/// Ranked candidate returned by the suggestion query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSuggestion {
    pub user: User,
    pub matched_interests: u32,
    /// Percentage (0..=100) of the volunteer's interests the candidate shares.
    pub match_score: f64,
}

/// Registration data. The password is only ever held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub role: String,
    pub interest_ids: Vec<Uuid>,
}

/// Partial profile update. Empty strings and empty interest lists leave the
/// stored value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub interest_ids: Option<Vec<Uuid>>,
}

/// Token pair issued on register, login and refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Authenticated caller resolved from an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}
