//! Shared helpers for the HTTP integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use lodge_api::auth::jwt::{generate_access_token, JwtConfig};
use lodge_api::auth::password::hash_password;
use lodge_api::config::ServerConfig;
use lodge_api::router::build_app_router;
use lodge_api::state::AppState;
use lodge_core::roles::Role;
use lodge_core::session::Session;
use lodge_db::models::booking::{Booking, CreateBooking};
use lodge_db::models::user::{CreateUser, User};
use lodge_db::repositories::{BookingRepo, UserRepo};

pub const TEST_PASSWORD: &str = "front-desk-password";

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// The production router and middleware stack over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user (with profile) whose password is [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, full_name: &str, role: Role) -> User {
    UserRepo::create_with_profile(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role,
            full_name: full_name.to_string(),
        },
    )
    .await
    .unwrap()
}

/// An access token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(&Session::new(user.id, user.role), &test_config().jwt).unwrap()
}

/// Booking `code` in room 101 checking in on 2024-06-`day`.
pub async fn create_booking(pool: &PgPool, code: &str, day: u32) -> Booking {
    BookingRepo::create(
        pool,
        &CreateBooking {
            code: code.to_string(),
            guest_name: "Mario Rossi".to_string(),
            room_number: "101".to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2024, 6, day + 3).unwrap(),
        },
    )
    .await
    .unwrap()
}

pub fn rossi() -> Value {
    json!({
        "firstName": "Mario",
        "lastName": "Rossi",
        "address": "Via Roma 1, Milano",
        "documentType": "Carta d'identità",
        "documentNumber": "AB123",
        "stayDuration": 3
    })
}

pub fn bianchi() -> Value {
    json!({
        "firstName": "Luca",
        "lastName": "Bianchi",
        "address": "Via Roma 1, Milano",
        "documentType": "Passaporto",
        "documentNumber": "XY999"
    })
}

/// Register Rossi with Bianchi against `booking_id`, asserting 201, and
/// return the created guests.
pub async fn register_rossi(app: Router, booking_id: i64, token: &str) -> Vec<Value> {
    let body = json!({
        "booking_id": booking_id,
        "main_guest": rossi(),
        "additional_guests": [bianchi()]
    });
    let response = post_json_auth(app, "/api/v1/registrations", body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].as_array().unwrap().clone()
}
