use axum::{Router, routing::get};

use crate::state::AppState;

mod common;
mod get;
mod post;

pub use get::{get_journal, list_journals, validate_schedule};
pub use post::create_journal;

/// `/journals`
pub fn journal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_journals).post(create_journal))
        .route("/{journal_id}", get(get_journal))
        .route("/schedules/{schedule_id}/validate", get(validate_schedule))
}
