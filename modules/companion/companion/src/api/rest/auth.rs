//! Bearer-token middleware and the authenticated-caller extractor.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::{HeaderMap, StatusCode, header, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use companion_sdk::Caller;

use super::error::domain_error_to_problem;
use super::problem::Problem;
use crate::domain::auth::AuthService;

/// Caller identity placed into request extensions by [`require_caller`].
#[derive(Debug, Clone, Copy)]
pub struct Authn(pub Caller);

impl<S> FromRequestParts<S> for Authn
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .copied()
            .map(Authn)
            .ok_or_else(|| {
                unauthenticated("No authenticated caller on request", parts.uri.path())
            })
    }
}

/// Resolves the bearer token into a [`Caller`] or short-circuits with 401.
pub async fn require_caller(
    State(auth): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let Some(token) = extract_bearer_token(request.headers()) else {
        return unauthenticated("Missing bearer token", &path).into_response();
    };

    match auth.authenticate(token) {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(e) => domain_error_to_problem(&e, &path).into_response(),
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn unauthenticated(detail: &str, instance: &str) -> Problem {
    Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail)
        .with_code("UNAUTHENTICATED")
        .with_instance(instance)
}
