use axum::{extract::State, response::Response};
use services::academic;

use crate::response::{app_error, ok};
use crate::state::AppState;

/// GET /api/academic-years
///
/// All academic years, newest name first.
pub async fn list_academic_years(State(state): State<AppState>) -> Response {
    match academic::list_academic_years(state.db()).await {
        Ok(years) => ok(years, "Academic years retrieved"),
        Err(e) => app_error(e),
    }
}

/// GET /api/active-weeks
///
/// Active rotation week of every configured grade in the active academic year.
pub async fn list_active_weeks(State(state): State<AppState>) -> Response {
    match academic::list_active_weeks(state.db()).await {
        Ok(weeks) => ok(weeks, "Active weeks retrieved"),
        Err(e) => app_error(e),
    }
}
