//! Account registration, login and token handling.

use std::sync::Arc;

use companion_sdk::{AuthTokens, Caller, Registration, Role, User};
use tracing::{info, instrument, warn};

use super::ServiceConfig;
use super::error::DomainError;
use super::ports::{PasswordHasher, TokenIssuer, TokenKind, TokenSubject};
use super::repo::{InterestRepository, NewUserRecord, UserRepository};

const MIN_PASSWORD_LEN: usize = 6;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    interests: Arc<dyn InterestRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    config: ServiceConfig,
}

impl AuthService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        interests: Arc<dyn InterestRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            users,
            interests,
            hasher,
            tokens,
            config,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: Registration) -> Result<AuthTokens, DomainError> {
        if req.name.trim().is_empty() {
            return Err(DomainError::validation("name", "must not be empty"));
        }
        let email = req.email.trim().to_owned();
        if email.is_empty() {
            return Err(DomainError::validation("email", "must not be empty"));
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        self.config.check_text("name", Some(&req.name))?;
        self.config.check_text("email", Some(&email))?;
        self.config.check_text("bio", req.bio.as_deref())?;
        if self.users.exists_by_email(&email).await? {
            return Err(DomainError::EmailTaken);
        }
        let role: Role = req
            .role
            .parse()
            .map_err(|_| DomainError::InvalidRole(req.role.clone()))?;

        let password_hash = self.hasher.hash(&req.password)?;
        let interest_ids = if req.interest_ids.is_empty() {
            Vec::new()
        } else {
            self.interests
                .find_by_ids(&req.interest_ids)
                .await?
                .into_iter()
                .map(|i| i.id)
                .collect()
        };

        let user = self
            .users
            .create(NewUserRecord {
                name: req.name,
                email,
                password_hash,
                age: req.age,
                bio: req.bio,
                role,
                interest_ids,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "user registered");
        self.issue_pair(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, DomainError> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(email.trim())
            .await?
        else {
            return Err(DomainError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &stored.password_hash)? {
            warn!(user_id = %stored.user.id, "password mismatch");
            return Err(DomainError::InvalidCredentials);
        }
        if !stored.user.is_active {
            return Err(DomainError::UserDeactivated);
        }

        self.issue_pair(stored.user)
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, DomainError> {
        let subject = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        let user = self
            .users
            .find_by_id(subject.user_id)
            .await?
            .ok_or(DomainError::InvalidToken)?;
        if !user.is_active {
            return Err(DomainError::UserDeactivated);
        }
        self.issue_pair(user)
    }

    /// Resolves an access token into the calling identity.
    pub fn authenticate(&self, access_token: &str) -> Result<Caller, DomainError> {
        let subject = self.tokens.verify(access_token, TokenKind::Access)?;
        Ok(Caller {
            user_id: subject.user_id,
            role: subject.role,
        })
    }

    fn issue_pair(&self, user: User) -> Result<AuthTokens, DomainError> {
        let subject = TokenSubject {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
        };
        Ok(AuthTokens {
            access_token: self.tokens.issue(&subject, TokenKind::Access)?,
            refresh_token: self.tokens.issue(&subject, TokenKind::Refresh)?,
            user,
        })
    }
}
