use chrono::NaiveDate;
use serde::Deserialize;
use services::journal::NewJournalEntry;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalReq {
    pub schedule_id: i64,
    pub journal_date: NaiveDate,
    #[validate(length(min = 1, max = 255, message = "Topic must be 1-255 characters"))]
    pub topic: String,
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl From<CreateJournalReq> for NewJournalEntry {
    fn from(req: CreateJournalReq) -> Self {
        NewJournalEntry {
            schedule_id: req.schedule_id,
            journal_date: req.journal_date,
            topic: req.topic,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<NaiveDate>,
}
