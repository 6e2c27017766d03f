use chrono::NaiveDate;
use db::models::attendance_session;
use serde::{Deserialize, Serialize};
use services::attendance::ManualEntry;
use util::clock::Clock;
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct AttendanceSessionResponse {
    pub id: i64,
    pub class_id: i64,
    pub session_date: NaiveDate,
    /// QR payload.
    pub token: String,
    pub expires_at: String,
    /// Expiry on the school's wall clock, `HH:MM`.
    pub expires_at_local: String,
    pub created_by: i64,
    pub academic_year_id: i64,
    pub created_at: String,
}

impl AttendanceSessionResponse {
    pub fn new(m: attendance_session::Model, clock: &dyn Clock) -> Self {
        Self {
            expires_at_local: clock.civil(m.expires_at).hhmm(),
            id: m.id,
            class_id: m.class_id,
            session_date: m.session_date,
            token: m.token,
            expires_at: m.expires_at.to_rfc3339(),
            created_by: m.created_by,
            academic_year_id: m.academic_year_id,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScanReq {
    #[validate(length(min = 1, max = 128, message = "Token is required"))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ManualReq {
    #[validate(length(min = 1, message = "At least one entry is required"))]
    pub entries: Vec<ManualEntry>,
}

#[derive(Debug, Serialize)]
pub struct ManualResponse {
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
