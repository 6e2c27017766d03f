use axum::{
    Extension,
    extract::{Path, Query, State},
    response::Response,
};
use services::reports;
use util::clock::Clock;

use super::common::HistoryQuery;
use crate::auth::AuthUser;
use crate::response::{app_error, ok};
use crate::state::AppState;

/// GET /api/attendance/classes/{class_id}/today
///
/// Today's roster of the class: every enrolled student with their record or `null`
/// status, plus `marked` / `unmarked` counts and today's session if open.
pub async fn class_today(State(state): State<AppState>, Path(class_id): Path<i64>) -> Response {
    let today = state.clock().now().date;
    match reports::class_today(state.db(), today, class_id).await {
        Ok(roster) => ok(roster, "Class attendance retrieved"),
        Err(e) => app_error(e),
    }
}

/// GET /api/attendance/students/{student_id}/history?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn student_history(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(q): Query<HistoryQuery>,
) -> Response {
    match reports::student_history(state.db(), student_id, q.from, q.to).await {
        Ok(records) => ok(records, "Attendance history retrieved"),
        Err(e) => app_error(e),
    }
}

/// GET /api/attendance/me/history
///
/// The caller's own records.
pub async fn my_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<HistoryQuery>,
) -> Response {
    match reports::student_history(state.db(), user.id(), q.from, q.to).await {
        Ok(records) => ok(records, "Attendance history retrieved"),
        Err(e) => app_error(e),
    }
}

/// GET /api/attendance/teachers/me/today
///
/// The caller's lessons today with session status and present / enrolled counts.
pub async fn teacher_today(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    let now = state.clock().now();
    match reports::teacher_today(state.db(), &now, user.id()).await {
        Ok(lessons) => ok(lessons, "Today's classes retrieved"),
        Err(e) => app_error(e),
    }
}
