use axum::{
    extract::{Path, State},
    response::Response,
};

use crate::response::{app_error, ok};
use crate::state::AppState;

/// DELETE /api/attendance/sessions/{session_id}
///
/// Removes the session. Records already taken under it stay in place. Admin only.
pub async fn delete_session(State(state): State<AppState>, Path(session_id): Path<i64>) -> Response {
    match state.attendance().delete_session(session_id).await {
        Ok(()) => ok((), "Attendance session deleted"),
        Err(e) => app_error(e),
    }
}
