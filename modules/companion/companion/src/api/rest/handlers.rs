use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use companion_sdk::RoleFilter;
use uuid::Uuid;

use super::auth::Authn;
use super::dto::{
    AppointmentDto, AuthResponse, CompleteRequest, ConnectRequest, ConnectionDto,
    CreateAppointmentRequest, HealthResponse, InterestDto, InterestIdsRequest, LoginRequest,
    MatchSuggestionDto, MeetingUrlRequest, RefreshRequest, RegisterRequest, SuggestionsQuery,
    UpdateProfileRequest, UserDto,
};
use super::extract::{Json, Path, Query};
use super::problem::ApiResult;
use crate::domain::appointments::AppointmentService;
use crate::domain::auth::AuthService;
use crate::domain::interests::InterestService;
use crate::domain::matching::MatchingService;
use crate::domain::users::UserService;

fn list<T, D: From<T>>(items: Vec<T>) -> Json<Vec<D>> {
    Json(items.into_iter().map(D::from).collect())
}

#[allow(clippy::unused_async)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
    })
}

// Accounts

pub async fn register(
    Extension(svc): Extension<Arc<AuthService>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let tokens = svc.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse::from(tokens))))
}

pub async fn login(
    Extension(svc): Extension<Arc<AuthService>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let tokens = svc.login(&req.email, &req.password).await?;
    Ok(Json(tokens.into()))
}

pub async fn refresh(
    Extension(svc): Extension<Arc<AuthService>>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let tokens = svc.refresh(&req.refresh_token).await?;
    Ok(Json(tokens.into()))
}

// Interests

pub async fn list_interests(
    Extension(svc): Extension<Arc<InterestService>>,
) -> ApiResult<Json<Vec<InterestDto>>> {
    Ok(list(svc.get_all().await?))
}

pub async fn get_interest(
    Extension(svc): Extension<Arc<InterestService>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InterestDto>> {
    Ok(Json(svc.get_by_id(id).await?.into()))
}

// Users

pub async fn get_me(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<UserService>>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(svc.get_by_id(caller.user_id).await?.into()))
}

pub async fn update_me(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<UserService>>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.update_profile(caller.user_id, req.into()).await?;
    Ok(Json(user.into()))
}

pub async fn deactivate_me(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<UserService>>,
) -> ApiResult<StatusCode> {
    svc.deactivate(caller.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_my_interests(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<UserService>>,
    Json(req): Json<InterestIdsRequest>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.add_interests(caller.user_id, &req.interest_ids).await?;
    Ok(Json(user.into()))
}

pub async fn remove_my_interest(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<UserService>>,
    Path(interest_id): Path<Uuid>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.remove_interest(caller.user_id, interest_id).await?;
    Ok(Json(user.into()))
}

pub async fn get_user(
    Extension(svc): Extension<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(svc.get_by_id(id).await?.into()))
}

// Matching

pub async fn suggestions(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<MatchingService>>,
    Query(query): Query<SuggestionsQuery>,
) -> ApiResult<Json<Vec<MatchSuggestionDto>>> {
    let found = svc
        .get_suggestions(caller.user_id, RoleFilter::parse(&query.kind))
        .await?;
    Ok(list(found))
}

pub async fn connect(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<MatchingService>>,
    Json(req): Json<ConnectRequest>,
) -> ApiResult<impl IntoResponse> {
    let connection = svc.connect(caller.user_id, req.target_id).await?;
    Ok((StatusCode::CREATED, Json(ConnectionDto::from(connection))))
}

pub async fn connections(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<MatchingService>>,
) -> ApiResult<Json<Vec<ConnectionDto>>> {
    Ok(list(svc.get_connections(caller.user_id).await?))
}

pub async fn accept_connection(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<MatchingService>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ConnectionDto>> {
    Ok(Json(svc.accept_connection(id, caller.user_id).await?.into()))
}

pub async fn reject_connection(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<MatchingService>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ConnectionDto>> {
    Ok(Json(svc.reject_connection(id, caller.user_id).await?.into()))
}

// Appointments

pub async fn create_appointment(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<AppointmentService>>,
    Json(req): Json<CreateAppointmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let appointment = svc.create(caller.user_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(AppointmentDto::from(appointment))))
}

pub async fn my_appointments(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<AppointmentService>>,
) -> ApiResult<Json<Vec<AppointmentDto>>> {
    Ok(list(svc.get_my_appointments(caller.user_id).await?))
}

pub async fn upcoming(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<AppointmentService>>,
) -> ApiResult<Json<Vec<AppointmentDto>>> {
    Ok(list(svc.get_upcoming(caller.user_id).await?))
}

pub async fn get_appointment(
    Extension(svc): Extension<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AppointmentDto>> {
    Ok(Json(svc.get_by_id(id).await?.into()))
}

pub async fn accept_appointment(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AppointmentDto>> {
    Ok(Json(svc.accept(id, caller.user_id).await?.into()))
}

pub async fn decline_appointment(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AppointmentDto>> {
    Ok(Json(svc.decline(id, caller.user_id).await?.into()))
}

pub async fn cancel_appointment(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AppointmentDto>> {
    Ok(Json(svc.cancel(id, caller.user_id).await?.into()))
}

/// The body is optional; without one the appointment completes unrated.
pub async fn complete_appointment(
    Extension(svc): Extension<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
    body: Option<Json<CompleteRequest>>,
) -> ApiResult<Json<AppointmentDto>> {
    let rating = body.and_then(|Json(req)| req.rating);
    Ok(Json(svc.complete(id, rating).await?.into()))
}

pub async fn set_meeting_url(
    Extension(svc): Extension<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
    Json(req): Json<MeetingUrlRequest>,
) -> ApiResult<Json<AppointmentDto>> {
    Ok(Json(svc.set_meeting_url(id, req.meeting_url).await?.into()))
}

pub async fn received_invitations(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<AppointmentService>>,
) -> ApiResult<Json<Vec<AppointmentDto>>> {
    Ok(list(svc.get_received_invitations(caller.user_id).await?))
}

pub async fn sent_invitations(
    Authn(caller): Authn,
    Extension(svc): Extension<Arc<AppointmentService>>,
) -> ApiResult<Json<Vec<AppointmentDto>>> {
    Ok(list(svc.get_sent_invitations(caller.user_id).await?))
}
