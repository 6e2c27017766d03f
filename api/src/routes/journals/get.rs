use axum::{
    Extension,
    extract::{Path, Query, State},
    response::Response,
};

use super::common::ListQuery;
use crate::auth::AuthUser;
use crate::response::{app_error, ok};
use crate::state::AppState;

/// GET /api/journals/schedules/{schedule_id}/validate
///
/// Whether the caller may write the journal for this lesson now.
///
/// ### Response
/// `200 OK` in both cases; `data.valid` carries the verdict and `data.reason` explains it.
/// ```json
/// {
///   "success": true,
///   "data": {
///     "valid": false,
///     "reason": "Journal can only be filled between 07:30 and 11:30 (now 12:04)",
///     "schedule_id": 3,
///     "day_of_week": "monday",
///     "start_time": "08:00:00",
///     "end_time": "09:30:00"
///   },
///   "message": "Journal timing checked"
/// }
/// ```
/// - `404 Not Found` if the schedule does not exist or is not the caller's
pub async fn validate_schedule(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(schedule_id): Path<i64>,
) -> Response {
    match state.journals().validate(schedule_id, user.id()).await {
        Ok(decision) => ok(decision, "Journal timing checked"),
        Err(e) => app_error(e),
    }
}

/// GET /api/journals?date=YYYY-MM-DD
///
/// The caller's journals, newest first.
pub async fn list_journals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<ListQuery>,
) -> Response {
    match state.journals().list_for_teacher(user.id(), q.date).await {
        Ok(journals) => ok(journals, "Journals retrieved"),
        Err(e) => app_error(e),
    }
}

/// GET /api/journals/{journal_id}
///
/// One of the caller's journals with the attendance summary of its linked session.
pub async fn get_journal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(journal_id): Path<i64>,
) -> Response {
    match state.journals().find_for_teacher(journal_id, user.id()).await {
        Ok(detail) => ok(detail, "Journal retrieved"),
        Err(e) => app_error(e),
    }
}
