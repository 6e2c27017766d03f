use db::models::schedule::WeekType;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAcademicYearReq {
    #[validate(length(min = 1, max = 32, message = "Name must be 1-32 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetActiveWeekReq {
    #[validate(range(min = 1, max = 13, message = "Grade must be between 1 and 13"))]
    pub grade: i32,
    pub week_type: WeekType,
}
