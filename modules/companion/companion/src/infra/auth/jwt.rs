//! HS256 bearer tokens.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::config::AuthConfig;
use crate::domain::error::DomainError;
use crate::domain::ports::{TokenIssuer, TokenKind, TokenSubject};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: String,
    kind: String,
    iat: i64,
    exp: i64,
    iss: String,
}

pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtTokenIssuer {
    #[must_use]
    pub fn new(cfg: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            access_ttl: Duration::hours(cfg.access_token_ttl_hours),
            refresh_ttl: Duration::days(cfg.refresh_token_ttl_days),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> Result<String, DomainError> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: subject.user_id.to_string(),
            email: subject.email.clone(),
            role: subject.role.as_str().to_owned(),
            kind: kind.as_str().to_owned(),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
            iss: self.issuer.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| DomainError::Database(anyhow::anyhow!("token signing failed: {e}")))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenSubject, DomainError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation()).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            DomainError::InvalidToken
        })?;
        let claims = data.claims;
        if claims.kind != kind.as_str() {
            return Err(DomainError::InvalidToken);
        }
        Ok(TokenSubject {
            user_id: claims.sub.parse().map_err(|_| DomainError::InvalidToken)?,
            role: claims.role.parse().map_err(|_| DomainError::InvalidToken)?,
            email: claims.email,
        })
    }
}
