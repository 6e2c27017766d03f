use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post},
};

use crate::auth::guards::allow_admin;
use crate::state::AppState;

mod common;
mod delete;
mod get;
mod post;

pub use delete::delete_session;
pub use get::{class_today, my_history, student_history, teacher_today};
pub use post::{create_session, mark_manual, regenerate_token, scan};

/// `/attendance`
pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/classes/{class_id}/session", post(create_session))
        .route("/classes/{class_id}/today", get(class_today))
        .route("/classes/{class_id}/manual", post(mark_manual))
        .route("/scan", post(scan))
        .route("/sessions/{session_id}/regenerate", post(regenerate_token))
        .route(
            "/sessions/{session_id}",
            delete(delete_session).route_layer(from_fn(allow_admin)),
        )
        .route("/students/{student_id}/history", get(student_history))
        .route("/me/history", get(my_history))
        .route("/teachers/me/today", get(teacher_today))
}
