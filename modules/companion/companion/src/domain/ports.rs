//! Output ports (interfaces) for domain services.

use companion_sdk::Role;
use uuid::Uuid;

use super::error::DomainError;

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> anyhow::Result<String>;

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    fn verify(&self, password: &str, hash: &str) -> anyhow::Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// Identity carried inside a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Signs and verifies bearer tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> Result<String, DomainError>;

    /// Fails with [`DomainError::InvalidToken`] on a bad signature, expiry,
    /// wrong issuer or a token of another kind.
    fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenSubject, DomainError>;
}
