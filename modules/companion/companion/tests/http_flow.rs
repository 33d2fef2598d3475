#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Full module over HTTP: real JWT, argon2 and SQLite.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use companion::{AuthConfig, CompanionConfig, CompanionModule, DatabaseConfig, connect_database};
use serde_json::{Value, json};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

async fn module() -> CompanionModule {
    let db = connect_database(&DatabaseConfig {
        dsn: "sqlite::memory:".to_owned(),
        max_connections: 8,
    })
    .await
    .expect("in-memory database");
    CompanionModule::init(
        db,
        &CompanionConfig::default(),
        &AuthConfig {
            jwt_secret: "integration-secret".to_owned(),
            ..AuthConfig::default()
        },
    )
    .await
    .expect("module init")
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(
    app: &Router,
    name: &str,
    role: &str,
    interest_ids: &[Value],
) -> (String, Value) {
    let (status, json) = call(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": format!("{}@example.org", name.to_lowercase()),
            "password": "secret1",
            "role": role,
            "interest_ids": interest_ids,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    (
        json["access_token"].as_str().unwrap().to_owned(),
        json["user"].clone(),
    )
}

#[tokio::test]
async fn volunteer_meets_elderly_person() {
    let module = module().await;
    let app = module.router();

    let (status, interests) = call(&app, "GET", "/api/v1/interests", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let interests = interests.as_array().unwrap().clone();
    assert_eq!(interests.len(), 10);
    let shared = vec![interests[0]["id"].clone(), interests[1]["id"].clone()];

    let (vera_token, _) = register(&app, "Vera", "volunteer", &shared).await;
    let (olga_token, olga) = register(&app, "Olga", "ELDERLY", &shared[..1]).await;

    let (status, suggestions) = call(
        &app,
        "GET",
        "/api/v1/matching/suggestions",
        Some(&vera_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(suggestions[0]["user"]["id"], olga["id"]);
    assert_eq!(suggestions[0]["match_score"], 50.0);

    let (status, connection) = call(
        &app,
        "POST",
        "/api/v1/matching/connect",
        Some(&vera_token),
        Some(json!({ "target_id": olga["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(connection["matched_interests"], 1);

    let (_, suggestions) = call(
        &app,
        "GET",
        "/api/v1/matching/suggestions",
        Some(&vera_token),
        None,
    )
    .await;
    assert!(suggestions.as_array().unwrap().is_empty());

    let date = (OffsetDateTime::now_utc() + Duration::days(2))
        .format(&Rfc3339)
        .unwrap();
    let (status, appointment) = call(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(&vera_token),
        Some(json!({ "target_id": olga["id"], "date": date, "duration_minutes": 45 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = appointment["id"].as_str().unwrap().to_owned();

    let (status, accepted) = call(
        &app,
        "POST",
        &format!("/api/v1/appointments/{id}/accept"),
        Some(&olga_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "CONFIRMED");

    let (_, upcoming) = call(
        &app,
        "GET",
        "/api/v1/appointments/upcoming",
        Some(&vera_token),
        None,
    )
    .await;
    assert_eq!(upcoming.as_array().unwrap().len(), 1);
    assert_eq!(upcoming[0]["duration_minutes"], 45);
}

#[tokio::test]
async fn login_and_refresh() {
    let module = module().await;
    let app = module.router();
    register(&app, "Ivan", "institution", &[]).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "ivan@example.org", "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "ivan@example.org", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let refresh_token = body["refresh_token"].as_str().unwrap().to_owned();
    let access_token = body["access_token"].as_str().unwrap().to_owned();

    let (status, _) = call(&app, "GET", "/api/v1/users/me", Some(&refresh_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "INSTITUTION");

    let (status, _) = call(&app, "DELETE", "/api/v1/users/me", Some(&access_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "ivan@example.org", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "USER_DEACTIVATED");
}
