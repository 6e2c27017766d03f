use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post, put},
};

use crate::auth::guards::allow_admin;
use crate::state::AppState;

mod common;
mod get;
mod post;
mod put;

pub use get::{list_academic_years, list_active_weeks};
pub use post::create_academic_year;
pub use put::{activate_academic_year, set_active_week};

/// `/academic-years`
pub fn academic_year_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_academic_years))
        .route(
            "/",
            post(create_academic_year).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{year_id}/activate",
            put(activate_academic_year).route_layer(from_fn(allow_admin)),
        )
}

/// `/active-weeks`
pub fn active_week_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_active_weeks))
        .route("/", put(set_active_week).route_layer(from_fn(allow_admin)))
}
