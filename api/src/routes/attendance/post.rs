use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use common::format_validation_errors;
use validator::Validate;

use super::common::{AttendanceSessionResponse, ManualReq, ManualResponse, ScanReq};
use crate::auth::AuthUser;
use crate::response::{app_error, fail, ok};
use crate::state::AppState;

/// POST /api/attendance/classes/{class_id}/session
///
/// Opens today's attendance session for the class, or returns the one already open.
/// The caller is recorded as the creator of a new session.
///
/// ### Responses
/// - `200 OK` with the session (token, expiry)
/// - `400 Bad Request` on weekends or when the class is out of this week's rotation
/// - `404 Not Found` if the class or an active academic year is missing
pub async fn create_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(class_id): Path<i64>,
) -> Response {
    match state
        .attendance()
        .create_or_get_session(user.id(), class_id)
        .await
    {
        Ok(session) => ok(
            AttendanceSessionResponse::new(session, state.clock().as_ref()),
            "Attendance session ready",
        ),
        Err(e) => app_error(e),
    }
}

/// POST /api/attendance/scan
///
/// Checks the caller in as present using a scanned QR token.
///
/// ### Request Body
/// ```json
/// { "token": "9f2c..." }
/// ```
///
/// ### Responses
/// - `200 OK` with the new record
/// - `400 Bad Request` if the token is not for today, the session expired, or the caller
///   is not a student of the class
/// - `404 Not Found` for an unknown token
/// - `409 Conflict` if the caller is already recorded for this session
pub async fn scan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ScanReq>,
) -> Response {
    if let Err(e) = req.validate() {
        return fail(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    match state.attendance().scan(user.id(), &req.token).await {
        Ok(record) => ok(record, "Attendance recorded"),
        Err(e) => app_error(e),
    }
}

/// POST /api/attendance/classes/{class_id}/manual
///
/// Upserts a batch of manual entries against today's session. All or nothing.
///
/// ### Request Body
/// ```json
/// { "entries": [ { "student_id": 4, "status": "sick", "notes": "fever" } ] }
/// ```
pub async fn mark_manual(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    Json(req): Json<ManualReq>,
) -> Response {
    if let Err(e) = req.validate() {
        return fail(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    match state
        .attendance()
        .mark_batch_manual(class_id, &req.entries)
        .await
    {
        Ok(count) => ok(ManualResponse { count }, "Attendance updated"),
        Err(e) => app_error(e),
    }
}

/// POST /api/attendance/sessions/{session_id}/regenerate
///
/// Issues a new token and extends the expiry from now. Existing records are kept.
pub async fn regenerate_token(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Response {
    match state.attendance().regenerate_token(session_id).await {
        Ok(session) => ok(
            AttendanceSessionResponse::new(session, state.clock().as_ref()),
            "Attendance token regenerated",
        ),
        Err(e) => app_error(e),
    }
}
