use crate::response::{fail, ok};
use crate::state::AppState;
use axum::{Router, extract::State, http::StatusCode, response::Response, routing::get};
use chrono::NaiveDate;
use serde::Serialize;
use util::clock::Clock;

/// Builds the `/health` route group.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub database: &'static str,
    /// School civil date and time, so clock/offset misconfiguration is visible.
    pub school_date: NaiveDate,
    pub school_time: String,
    pub weekday: String,
}

/// GET /health
///
/// ### Response
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": { "database": "ok", "school_date": "2025-09-08", "school_time": "08:15", "weekday": "Mon" },
///   "message": "Health check passed"
/// }
/// ```
/// - `503 Service Unavailable` if the database does not answer
async fn health_check(State(state): State<AppState>) -> Response {
    if let Err(e) = state.db().ping().await {
        tracing::error!(error = %e, "Health check: database unreachable");
        return fail(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
    }

    let now = state.clock().now();
    ok(
        HealthStatus {
            database: "ok",
            school_date: now.date,
            school_time: now.hhmm(),
            weekday: now.weekday.to_string(),
        },
        "Health check passed",
    )
}
