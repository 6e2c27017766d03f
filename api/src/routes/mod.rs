//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → health check (public)
//! - `/academic-years`, `/active-weeks` → academic configuration (writes are admin-only)
//! - `/attendance` → daily QR sessions, scans, manual entry and reports (authenticated)
//! - `/journals` → teaching journals and their timing window (authenticated)

use crate::auth::guards::allow_authenticated;
use crate::routes::{
    academic::{academic_year_routes, active_week_routes},
    attendance::attendance_routes,
    health::health_routes,
    journals::journal_routes,
};
use crate::state::AppState;
use axum::{Router, middleware::from_fn};

pub mod academic;
pub mod attendance;
pub mod health;
pub mod journals;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/academic-years",
            academic_year_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/active-weeks",
            active_week_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/journals",
            journal_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
