//! End-to-end handler tests over an in-memory backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use cinebook_core::mocks::{MockEmailSender, MockRepositories};
use cinebook_core::AuthConfig;
use cinebook_web::state::{AppConfig, AppState};
use cinebook_web::build_router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> (Router, MockRepositories, MockEmailSender) {
    let repo = MockRepositories::seeded_catalog();
    let email = MockEmailSender::new();
    let config = AppConfig {
        auth: AuthConfig::default().with_bcrypt_cost(4),
        ..AppConfig::default()
    };
    let state = Arc::new(AppState::new(repo.clone(), email.clone(), config));
    (build_router(state), repo, email)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_authed(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Registers, verifies, and logs in a user, returning a bearer token.
async fn login_user(app: &Router, repo: &MockRepositories, username: &str) -> String {
    let email = format!("{username}@example.com");
    let (status, body) = send(
        app,
        post_json(
            "/api/register",
            &json!({ "username": username, "email": email, "password": "hunter22" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["id"].as_i64().unwrap();

    let otp = repo.issued_otp_code(user_id).unwrap();
    let (status, _) = send(
        app,
        post_json("/api/verify-otp", &json!({ "email": email, "otp": otp })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        post_json(
            "/api/login",
            &json!({ "username": username, "password": "hunter22" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn health_reports_version() {
    let (app, _, _) = test_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn register_then_duplicate_conflicts() {
    let (app, _, _) = test_app();
    let payload = json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "hunter22",
    });

    let (status, body) = send(&app, post_json("/api/register", &payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["is_verified"], false);

    let (status, body) = send(&app, post_json("/api/register", &payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let (app, _, _) = test_app();
    let (status, _) = send(
        &app,
        post_json(
            "/api/register",
            &json!({ "username": "bob", "email": "not-an-email", "password": "hunter22" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_before_verification_is_forbidden() {
    let (app, _, _) = test_app();
    let (status, _) = send(
        &app,
        post_json(
            "/api/register",
            &json!({ "username": "carol", "email": "carol@example.com", "password": "hunter22" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        post_json(
            "/api/login",
            &json!({ "username": "carol", "password": "hunter22" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let (app, _, _) = test_app();
    let (status, _) = send(
        &app,
        post_json(
            "/api/booking",
            &json!({ "showtime_id": 1, "seat_ids": [1], "payment_method_id": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/api/user/bookings")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get_authed("/api/user/bookings", "bogus")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_and_payment_flow() {
    let (app, repo, _) = test_app();
    let token = login_user(&app, &repo, "dave").await;

    let (status, body) = send(
        &app,
        post_json_authed(
            "/api/booking",
            &token,
            &json!({ "showtime_id": 1, "seat_ids": [1, 2], "payment_method_id": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = body["booking"]["id"].as_i64().unwrap();
    assert_eq!(body["booking"]["status"], "pending");
    assert_eq!(body["seats"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        post_json_authed(
            "/api/pay",
            &token,
            &json!({ "booking_id": booking_id, "payment_method_id": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let (status, body) = send(&app, get_authed("/api/user/bookings", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["booking"]["status"], "paid");

    // Paying twice conflicts.
    let (status, _) = send(
        &app,
        post_json_authed(
            "/api/pay",
            &token,
            &json!({ "booking_id": booking_id, "payment_method_id": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn taken_seats_conflict() {
    let (app, repo, _) = test_app();
    let token = login_user(&app, &repo, "erin").await;

    let (status, _) = send(
        &app,
        post_json_authed(
            "/api/booking",
            &token,
            &json!({ "showtime_id": 1, "seat_ids": [1, 2], "payment_method_id": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        post_json_authed(
            "/api/booking",
            &token,
            &json!({ "showtime_id": 1, "seat_ids": [2, 3], "payment_method_id": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let (app, repo, _) = test_app();
    let token = login_user(&app, &repo, "frank").await;

    let (status, _) = send(
        &app,
        post_json_authed("/api/logout", &token, &Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get_authed("/api/user/bookings", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn catalog_endpoints_serve_seeded_data() {
    let (app, _, _) = test_app();

    let (status, body) = send(&app, get("/api/movies?page=1&limit=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movies"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["total_records"], 1);

    let (status, body) = send(&app, get("/api/cinemas")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cinemas"][0]["name"], "Grand Central");

    let (status, body) = send(&app, get("/api/cinemas/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["studios"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, get("/api/cinemas/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/api/cinemas/1/showtimes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, get("/api/payment-methods")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn seat_availability_validates_the_query() {
    let (app, _, _) = test_app();

    let (status, body) =
        send(&app, get("/api/cinemas/1/seats?date=2026-09-01&time=19:30")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, _) = send(&app, get("/api/cinemas/1/seats?date=tomorrow&time=19:30")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/cinemas/1/seats?date=2026-09-01&time=late")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_serves_both_variants() {
    let (app, _, _) = test_app();

    for uri in ["/api/dashboard", "/api/dashboard/concurrent"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_bookings"], 0);
        assert_eq!(body["bookings"].as_array().unwrap().len(), 0);
        assert_eq!(body["stats"]["min"], 0.0);
    }
}

#[tokio::test]
async fn dashboard_rejects_non_positive_limits() {
    let (app, _, _) = test_app();

    for uri in [
        "/api/dashboard?limit=0",
        "/api/dashboard?limit=-3",
        "/api/dashboard/concurrent?limit=0",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }
}
