use std::time::Duration;

use axum::http::{HeaderName, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::{Extension, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::auth::require_caller;
use super::handlers;
use crate::module::Services;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn public_routes() -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/refresh", post(handlers::refresh))
        .route("/interests", get(handlers::list_interests))
        .route("/interests/{id}", get(handlers::get_interest))
}

fn protected_routes() -> Router {
    Router::new()
        .route(
            "/users/me",
            get(handlers::get_me)
                .put(handlers::update_me)
                .delete(handlers::deactivate_me),
        )
        .route("/users/me/interests", post(handlers::add_my_interests))
        .route(
            "/users/me/interests/{interest_id}",
            axum::routing::delete(handlers::remove_my_interest),
        )
        .route("/users/{id}", get(handlers::get_user))
        .route("/matching/suggestions", get(handlers::suggestions))
        .route("/matching/connect", post(handlers::connect))
        .route("/matching/connections", get(handlers::connections))
        .route(
            "/matching/connections/{id}/accept",
            post(handlers::accept_connection),
        )
        .route(
            "/matching/connections/{id}/reject",
            post(handlers::reject_connection),
        )
        .route(
            "/appointments",
            post(handlers::create_appointment).get(handlers::my_appointments),
        )
        .route("/appointments/upcoming", get(handlers::upcoming))
        .route(
            "/appointments/{id}",
            get(handlers::get_appointment).delete(handlers::cancel_appointment),
        )
        .route("/appointments/{id}/accept", post(handlers::accept_appointment))
        .route("/appointments/{id}/decline", post(handlers::decline_appointment))
        .route("/appointments/{id}/complete", post(handlers::complete_appointment))
        .route("/appointments/{id}/meeting-url", put(handlers::set_meeting_url))
        .route("/invitations/received", get(handlers::received_invitations))
        .route("/invitations/sent", get(handlers::sent_invitations))
}

/// Builds the `/api/v1` router with services attached as extensions.
pub fn router(services: &Services) -> Router {
    let protected =
        protected_routes().route_layer(from_fn_with_state(services.auth.clone(), require_caller));

    let api = public_routes()
        .merge(protected)
        .layer(Extension(services.auth.clone()))
        .layer(Extension(services.users.clone()))
        .layer(Extension(services.interests.clone()))
        .layer(Extension(services.matching.clone()))
        .layer(Extension(services.appointments.clone()));

    let x_request_id = HeaderName::from_static("x-request-id");

    // Layers run bottom-up: request id is set before the trace span opens.
    Router::new()
        .nest("/api/v1", api)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(
            |req: &axum::http::Request<axum::body::Body>| {
                let rid = req
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %rid,
                )
            },
        ))
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}
