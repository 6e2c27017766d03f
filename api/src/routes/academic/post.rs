use axum::{Json, extract::State, http::StatusCode, response::Response};
use common::format_validation_errors;
use services::academic;
use validator::Validate;

use super::common::CreateAcademicYearReq;
use crate::response::{app_error, fail, ok};
use crate::state::AppState;

/// POST /api/academic-years
///
/// Creates an inactive academic year. Admin only.
///
/// ### Request Body
/// ```json
/// { "name": "2026/2027" }
/// ```
///
/// ### Responses
/// - `200 OK` with the new year
/// - `400 Bad Request` on an empty or overlong name
/// - `409 Conflict` if the name is taken
pub async fn create_academic_year(
    State(state): State<AppState>,
    Json(req): Json<CreateAcademicYearReq>,
) -> Response {
    if let Err(e) = req.validate() {
        return fail(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    match academic::create_academic_year(state.db(), &req.name).await {
        Ok(year) => ok(year, "Academic year created"),
        Err(e) => app_error(e),
    }
}
