use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};
use common::format_validation_errors;
use validator::Validate;

use super::common::CreateJournalReq;
use crate::auth::AuthUser;
use crate::response::{app_error, fail, ok};
use crate::state::AppState;

/// POST /api/journals
///
/// Writes the caller's journal for a lesson held today.
///
/// ### Request Body
/// ```json
/// { "schedule_id": 3, "journal_date": "2025-09-08", "topic": "Quadratic equations" }
/// ```
///
/// ### Responses
/// - `200 OK` with the journal (linked to today's attendance session when one exists)
/// - `400 Bad Request` outside the allowed window, on the wrong day, or for another date
/// - `404 Not Found` if the schedule is not the caller's
/// - `409 Conflict` if the journal for this lesson and date already exists
pub async fn create_journal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateJournalReq>,
) -> Response {
    if let Err(e) = req.validate() {
        return fail(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    match state.journals().create_entry(user.id(), req.into()).await {
        Ok(journal) => ok(journal, "Journal created"),
        Err(e) => app_error(e),
    }
}
