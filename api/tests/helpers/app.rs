use std::sync::Arc;

use api::{auth::generate_jwt, routes::routes, state::AppState};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, NaiveDate, NaiveTime};
use db::models::user;
use db::test_utils::{SchoolFixture, seed_school, setup_test_db};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use services::journal::TimingPolicy;
use tower::ServiceExt;
use util::clock::{FixedClock, offset_from_minutes};

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
    pub school: SchoolFixture,
}

/// Monday 2025-09-08, 08:15 school time: inside the fixture's 08:00-09:30 lesson.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 8).unwrap()
}

pub async fn make_test_app() -> TestApp {
    make_test_app_at(monday(), 8, 15).await
}

pub async fn make_test_app_at(date: NaiveDate, hour: u32, minute: u32) -> TestApp {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;

    let clock = FixedClock::at_local(
        date,
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        offset_from_minutes(420),
    );
    let state = AppState::new(
        db.clone(),
        Arc::new(clock),
        Duration::hours(3),
        TimingPolicy::default(),
    );
    let app = Router::new().nest("/api", routes(state));

    TestApp { app, db, school }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

pub fn bearer(user: &user::Model) -> String {
    let (token, _) = generate_jwt(user.id, user.role).unwrap();
    format!("Bearer {token}")
}

pub fn json_request(method: &str, uri: &str, user: &user::Model, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", bearer(user))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, user: &user::Model) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", bearer(user))
        .body(Body::empty())
        .unwrap()
}
