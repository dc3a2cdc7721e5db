use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use lab_reservation_server::backend::{
    config::{BootstrapAdmin, ServerConfig},
    create_router,
    domain::FixedClock,
    initialize_backend_with,
    storage::CsvConnection,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

struct TestApp {
    _temp_dir: TempDir,
    router: Router,
}

async fn setup_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let connection = CsvConnection::new(temp_dir.path()).unwrap();
    let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()));
    let config = ServerConfig {
        data_directory: Some(temp_dir.path().to_path_buf()),
        bootstrap_admin: Some(BootstrapAdmin {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        }),
        ..ServerConfig::default()
    };

    let state = initialize_backend_with(connection, clock, &config).await.unwrap();
    let router = create_router(state, &config).unwrap();
    TestApp {
        _temp_dir: temp_dir,
        router,
    }
}

async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn sign_in(app: &TestApp, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/sign-in",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn create_student(app: &TestApp, admin_token: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/admin/users",
        Some(admin_token),
        Some(json!({ "email": email, "password": "secret1", "student_id": "2021-00001" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["user"]["role"], "student");
    body["user"]["id"].as_str().unwrap().to_string()
}

fn day_cell<'a>(calendar: &'a Value, iso: &str) -> &'a Value {
    calendar["days"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["date"] == iso)
        .unwrap()
}

#[tokio::test]
async fn test_student_booking_flow() {
    let app = setup_app().await;
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    create_student(&app, &admin, "student@example.com").await;
    let student = sign_in(&app, "student@example.com", "secret1").await;

    let (status, morning) = send(
        &app,
        Method::POST,
        "/api/reservations",
        Some(&student),
        Some(json!({ "date": "2024-06-10", "start_time": "08:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(morning["outcome"], "created");
    assert_eq!(morning["reservation"]["slot"], "morning");
    assert_eq!(morning["reservation"]["end_time"], "09:00");
    let morning_id = morning["reservation"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/reservations",
        Some(&student),
        Some(json!({ "date": "2024-06-10", "start_time": "13:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, calendar) = send(&app, Method::GET, "/api/calendar/month?year=2024&month=6", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calendar["first_weekday"], 5);
    assert_eq!(calendar["days"].as_array().unwrap().len() % 7, 0);
    assert_eq!(day_cell(&calendar, "2024-06-10")["status"], "red");

    let (status, _) = send(&app, Method::POST, &format!("/api/reservations/{}/cancel", morning_id), Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, calendar) = send(&app, Method::GET, "/api/calendar/month?year=2024&month=6", Some(&student), None).await;
    let cell = day_cell(&calendar, "2024-06-10");
    assert_eq!(cell["status"], "afternoon");
    assert_eq!(cell["has_cancelled"], true);

    let (status, again) = send(
        &app,
        Method::POST,
        "/api/reservations",
        Some(&student),
        Some(json!({ "date": "2024-06-10", "start_time": "08:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["outcome"], "reactivated");
    assert_eq!(again["reservation"]["id"], morning_id.as_str());

    let (status, mine) = send(&app, Method::GET, "/api/reservations", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["reservations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rejections_carry_messages() {
    let app = setup_app().await;
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    create_student(&app, &admin, "student@example.com").await;
    let student = sign_in(&app, "student@example.com", "secret1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/reservations",
        Some(&student),
        Some(json!({ "date": "2024-06-01", "start_time": "08:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("past"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/reservations",
        Some(&student),
        Some(json!({ "date": "2024-06-10", "start_time": "10:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/calendar/month?year=2024&month=13", Some(&student), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/reservations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/api/admin/users", Some(&student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Administrator access required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/sign-in",
        None,
        Some(json!({ "email": "student@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_review_and_account_management() {
    let app = setup_app().await;
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let student_id = create_student(&app, &admin, "student@example.com").await;
    let student = sign_in(&app, "student@example.com", "secret1").await;

    let (_, submitted) = send(
        &app,
        Method::POST,
        "/api/reservations",
        Some(&student),
        Some(json!({ "date": "2024-06-12", "start_time": "13:00" })),
    )
    .await;
    let reservation_id = submitted["reservation"]["id"].as_str().unwrap().to_string();

    let (status, accepted) = send(
        &app,
        Method::POST,
        &format!("/api/admin/reservations/{}/accept", reservation_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["reservation"]["lifecycle"], "accepted");

    let (_, history) = send(&app, Method::GET, "/api/admin/reservations/history", Some(&admin), None).await;
    assert_eq!(history["reservations"][0]["user_email"], "student@example.com");

    let (_, schedule) = send(&app, Method::GET, "/api/admin/reservations", Some(&admin), None).await;
    assert_eq!(schedule["reservations"].as_array().unwrap().len(), 1);

    let (status, slot) = send(
        &app,
        Method::POST,
        "/api/admin/availability",
        Some(&admin),
        Some(json!({ "date": "2024-06-20", "start_time": "08:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slot["end_time"], "09:00");
    assert_eq!(slot["room"], "Laboratory");

    let (_, available) = send(&app, Method::GET, "/api/availability", Some(&student), None).await;
    assert_eq!(available["slots"].as_array().unwrap().len(), 1);

    let (status, logs) = send(&app, Method::GET, "/api/admin/logs", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let logs = logs["logs"].as_array().unwrap();
    assert!(logs.len() >= 3);
    let log_id = logs[0]["id"].as_str().unwrap().to_string();
    let (status, _) = send(&app, Method::DELETE, &format!("/api/admin/logs/{}", log_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/admin/logs/{}", log_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, deactivated) = send(
        &app,
        Method::POST,
        &format!("/api/admin/users/{}/deactivate", student_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deactivated["user"]["is_active"], false);

    let (status, _) = send(&app, Method::GET, "/api/users/me", Some(&student), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/sign-in",
        None,
        Some(json!({ "email": "student@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Account is deactivated. Please contact admin.");
}

#[tokio::test]
async fn test_sign_out_and_profile() {
    let app = setup_app().await;
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    create_student(&app, &admin, "student@example.com").await;
    let student = sign_in(&app, "student@example.com", "secret1").await;

    let (status, profile) = send(&app, Method::GET, "/api/users/me", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "student@example.com");
    assert_eq!(profile["student_id"], "2021-00001");

    let (status, current) = send(&app, Method::GET, "/api/calendar/current-date", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["iso_date"], "2024-06-05");

    let (status, _) = send(&app, Method::POST, "/api/auth/sign-out", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/api/users/me", Some(&student), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_requests_return_error_body() {
    let app = setup_app().await;
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    create_student(&app, &admin, "student@example.com").await;
    let student = sign_in(&app, "student@example.com", "secret1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/reservations",
        Some(&student),
        Some(json!({ "date": "2024-06-10" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("start_time"), "{}", body);

    let (status, body) = send(&app, Method::GET, "/api/calendar/month?year=2024&month=abc", Some(&student), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{}", body);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/admin/users",
        Some(&admin),
        Some(json!({ "email": "other@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("password"), "{}", body);
}
