//! Wire types for the REST surface.

use companion_sdk::{
    Appointment, AuthTokens, Connection, Interest, MatchSuggestion, NewAppointment, ProfilePatch,
    Registration, User,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestDto {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
}

impl From<Interest> for InterestDto {
    fn from(i: Interest) -> Self {
        Self {
            id: i.id,
            name: i.name,
            icon: i.icon,
        }
    }
}

/// Public user view. Credentials never leave the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub interests: Vec<InterestDto>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            age: u.age,
            bio: u.bio,
            phone: u.phone,
            photo_url: u.photo_url,
            role: u.role.as_str().to_owned(),
            is_active: u.is_active,
            interests: u.interests.into_iter().map(InterestDto::from).collect(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDto {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub target_id: Uuid,
    pub target_role: String,
    pub status: String,
    pub matched_interests: u32,
    pub version: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer: Option<UserDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<UserDto>,
}

impl From<Connection> for ConnectionDto {
    fn from(c: Connection) -> Self {
        Self {
            id: c.id,
            volunteer_id: c.volunteer_id,
            target_id: c.target_id,
            target_role: c.target_role.as_str().to_owned(),
            status: c.status.as_str().to_owned(),
            matched_interests: c.matched_interests,
            version: c.version,
            created_at: c.created_at,
            updated_at: c.updated_at,
            volunteer: c.volunteer.map(UserDto::from),
            target: c.target.map(UserDto::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDto {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub target_id: Uuid,
    pub target_role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub duration_minutes: i32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub version: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer: Option<UserDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<UserDto>,
}

impl From<Appointment> for AppointmentDto {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            volunteer_id: a.volunteer_id,
            target_id: a.target_id,
            target_role: a.target_role.as_str().to_owned(),
            date: a.date,
            duration_minutes: a.duration_minutes,
            status: a.status.as_str().to_owned(),
            meeting_url: a.meeting_url,
            notes: a.notes,
            rating: a.rating,
            version: a.version,
            created_at: a.created_at,
            updated_at: a.updated_at,
            volunteer: a.volunteer.map(UserDto::from),
            target: a.target.map(UserDto::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSuggestionDto {
    pub user: UserDto,
    pub matched_interests: u32,
    pub match_score: f64,
}

impl From<MatchSuggestion> for MatchSuggestionDto {
    fn from(s: MatchSuggestion) -> Self {
        Self {
            user: s.user.into(),
            matched_interests: s.matched_interests,
            match_score: s.match_score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserDto,
}

impl From<AuthTokens> for AuthResponse {
    fn from(t: AuthTokens) -> Self {
        Self {
            access_token: t.access_token,
            refresh_token: t.refresh_token,
            user: t.user.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// Requests

#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub bio: Option<String>,
    pub role: String,
    #[serde(default)]
    pub interest_ids: Vec<Uuid>,
}

impl From<RegisterRequest> for Registration {
    fn from(r: RegisterRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            password: r.password,
            age: r.age,
            bio: r.bio,
            role: r.role,
            interest_ids: r.interest_ids,
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub interest_ids: Option<Vec<Uuid>>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            name: r.name,
            age: r.age,
            bio: r.bio,
            phone: r.phone,
            photo_url: r.photo_url,
            interest_ids: r.interest_ids,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterestIdsRequest {
    pub interest_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionsQuery {
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectRequest {
    pub target_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub target_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(default)]
    pub duration_minutes: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CreateAppointmentRequest> for NewAppointment {
    fn from(r: CreateAppointmentRequest) -> Self {
        Self {
            target_id: r.target_id,
            date: r.date,
            duration_minutes: r.duration_minutes,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompleteRequest {
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeetingUrlRequest {
    pub meeting_url: String,
}
