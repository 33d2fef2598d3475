use companion_sdk::CompanionError;
use uuid::Uuid;

/// Coarse classification used by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    InvalidArgument,
    Conflict,
    Unauthenticated,
    Upstream,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("only volunteers can perform this operation")]
    NotAVolunteer,

    #[error("caller is not the target of this appointment")]
    NotTarget,

    #[error("caller does not take part in this appointment")]
    NotParticipant,

    #[error("account is deactivated")]
    UserDeactivated,

    #[error("target must be an elderly person or an institution")]
    InvalidTarget,

    #[error("appointment date must be in the future")]
    PastDate,

    #[error("invalid role '{0}'")]
    InvalidRole(String),

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("a connection between these users already exists")]
    ConnectionAlreadyExists,

    #[error("appointment is no longer pending")]
    NotPending,

    #[error("email is already registered")]
    EmailTaken,

    #[error("{entity} {id} was modified concurrently")]
    StaleRevision { entity: &'static str, id: Uuid },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn stale(entity: &'static str, id: Uuid) -> Self {
        Self::StaleRevision { entity, id }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotAVolunteer
            | Self::NotTarget
            | Self::NotParticipant
            | Self::UserDeactivated => {
                ErrorKind::Forbidden
            }
            Self::InvalidTarget
            | Self::PastDate
            | Self::InvalidRole(_)
            | Self::Validation { .. } => ErrorKind::InvalidArgument,
            Self::ConnectionAlreadyExists
            | Self::NotPending
            | Self::EmailTaken
            | Self::StaleRevision { .. } => ErrorKind::Conflict,
            Self::InvalidCredentials | Self::InvalidToken => ErrorKind::Unauthenticated,
            Self::Database(_) => ErrorKind::Upstream,
        }
    }

    /// Stable machine-readable code for API consumers.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::NotAVolunteer => "NOT_A_VOLUNTEER",
            Self::NotTarget => "NOT_TARGET",
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::UserDeactivated => "USER_DEACTIVATED",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::PastDate => "PAST_DATE",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::ConnectionAlreadyExists => "CONNECTION_ALREADY_EXISTS",
            Self::NotPending => "NOT_PENDING",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::StaleRevision { .. } => "STALE_REVISION",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for CompanionError {
    fn from(e: DomainError) -> Self {
        match e.kind() {
            ErrorKind::NotFound => Self::not_found(e.to_string()),
            ErrorKind::Forbidden => Self::forbidden(e.to_string()),
            ErrorKind::InvalidArgument => Self::invalid_argument(e.to_string()),
            ErrorKind::Conflict => Self::conflict(e.to_string()),
            ErrorKind::Unauthenticated => Self::unauthenticated(e.to_string()),
            ErrorKind::Upstream => Self::internal(),
        }
    }
}
