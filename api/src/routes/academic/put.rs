use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use common::format_validation_errors;
use services::academic;
use validator::Validate;

use super::common::SetActiveWeekReq;
use crate::response::{app_error, fail, ok};
use crate::state::AppState;

/// PUT /api/academic-years/{year_id}/activate
///
/// Makes the year the only active one. Admin only.
pub async fn activate_academic_year(
    State(state): State<AppState>,
    Path(year_id): Path<i64>,
) -> Response {
    match academic::activate_academic_year(state.db(), year_id).await {
        Ok(year) => ok(year, "Academic year activated"),
        Err(e) => app_error(e),
    }
}

/// PUT /api/active-weeks
///
/// Sets the rotation week in force for a grade in the active year. Admin only.
///
/// ### Request Body
/// ```json
/// { "grade": 12, "week_type": "b" }
/// ```
pub async fn set_active_week(
    State(state): State<AppState>,
    Json(req): Json<SetActiveWeekReq>,
) -> Response {
    if let Err(e) = req.validate() {
        return fail(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    match academic::set_active_week(state.db(), req.grade, req.week_type).await {
        Ok(week) => ok(week, "Active week updated"),
        Err(e) => app_error(e),
    }
}
