use axum::http::StatusCode;

use super::problem::{Problem, ValidationViolation};
use crate::domain::error::{DomainError, ErrorKind};

/// Map domain error to an RFC 9457 Problem.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    let problem = match (e.kind(), e) {
        (_, DomainError::Validation { field, message }) => Problem::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Validation Failed",
            e.to_string(),
        )
        .with_errors(vec![ValidationViolation {
            field: field.clone(),
            message: message.clone(),
        }]),
        (ErrorKind::NotFound, _) => Problem::new(StatusCode::NOT_FOUND, "Not Found", e.to_string()),
        (ErrorKind::Forbidden, _) => {
            tracing::warn!(error = %e, "Domain rule rejected caller");
            Problem::new(StatusCode::FORBIDDEN, "Forbidden", e.to_string())
        }
        (ErrorKind::InvalidArgument, _) => {
            Problem::new(StatusCode::BAD_REQUEST, "Bad Request", e.to_string())
        }
        (ErrorKind::Conflict, _) => Problem::new(StatusCode::CONFLICT, "Conflict", e.to_string()),
        (ErrorKind::Unauthenticated, _) => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", e.to_string())
        }
        (ErrorKind::Upstream, _) => {
            tracing::error!(error = ?e, "Database error occurred");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal error occurred",
            )
        }
    };

    problem
        .with_code(e.code())
        .with_instance(instance)
        .with_trace_id(trace_id)
}

/// Implement From<DomainError> for Problem so `?` works in handlers
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e, "/")
    }
}
