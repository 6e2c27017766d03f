//! Teaching journals and the timing window in which they may be written.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use db::models::attendance_record::{self, AttendanceStatus};
use db::models::attendance_session::{self, Entity as AttendanceSession};
use db::models::schedule::{self, DayOfWeek};
use db::models::teaching_assignment;
use db::models::teaching_journal::{self, Entity as TeachingJournal};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use util::clock::{CivilDateTime, SharedClock};
use util::config;

use crate::academic;
use crate::error::{is_unique_violation, AppError};

/// How the journal window is enforced.
///
/// Chosen once when the service is built; production always runs `WindowBased`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingPolicy {
    /// Every submission is on time. Only for non-production runs.
    AlwaysValid,
    /// On time within `[start - before, end + after]` on the lesson's weekday.
    WindowBased { before: Duration, after: Duration },
}

const DEFAULT_GRACE_BEFORE_MINUTES: i64 = 30;
const DEFAULT_GRACE_AFTER_MINUTES: i64 = 120;

impl Default for TimingPolicy {
    fn default() -> Self {
        TimingPolicy::window_minutes(DEFAULT_GRACE_BEFORE_MINUTES, DEFAULT_GRACE_AFTER_MINUTES)
    }
}

/// Negative grace clamps to zero; values chrono cannot represent fall back to `default`.
fn grace(minutes: i64, default: i64, side: &str) -> Duration {
    if minutes < 0 {
        tracing::warn!(minutes, side, "Negative journal grace; using 0");
        return Duration::zero();
    }
    Duration::try_minutes(minutes).unwrap_or_else(|| {
        tracing::warn!(minutes, side, default, "Journal grace out of range; using default");
        Duration::minutes(default)
    })
}

impl TimingPolicy {
    pub fn window_minutes(before: i64, after: i64) -> Self {
        TimingPolicy::WindowBased {
            before: grace(before, DEFAULT_GRACE_BEFORE_MINUTES, "before"),
            after: grace(after, DEFAULT_GRACE_AFTER_MINUTES, "after"),
        }
    }

    /// Policy described by the global configuration.
    ///
    /// `JOURNAL_TIMING_BYPASS` is ignored when `APP_ENV=production`.
    pub fn from_config() -> Self {
        let cfg = config::AppConfig::global();
        if cfg.journal_timing_bypass {
            if cfg.is_production() {
                tracing::warn!("JOURNAL_TIMING_BYPASS is set in production; ignoring it");
            } else {
                tracing::warn!("Journal timing checks are bypassed");
                return TimingPolicy::AlwaysValid;
            }
        }
        TimingPolicy::window_minutes(
            cfg.journal_grace_before_minutes,
            cfg.journal_grace_after_minutes,
        )
    }

    /// Judges a submission at `now` for `slot`.
    pub fn decide(&self, slot: &schedule::Model, now: &CivilDateTime) -> JournalTimingDecision {
        let decision = |valid: bool, reason: String| JournalTimingDecision {
            valid,
            reason,
            schedule_id: slot.id,
            day_of_week: slot.day_of_week,
            start_time: slot.start_time,
            end_time: slot.end_time,
        };

        let (before, after) = match *self {
            TimingPolicy::AlwaysValid => {
                return decision(true, "Timing checks are disabled".into());
            }
            TimingPolicy::WindowBased { before, after } => (before, after),
        };

        let today = DayOfWeek::from(now.weekday);
        if today != slot.day_of_week {
            return decision(
                false,
                format!(
                    "This lesson is scheduled on {}, today is {}",
                    slot.day_of_week.label(),
                    today.label()
                ),
            );
        }

        // Seconds since midnight, so windows reaching past either end of the day don't wrap.
        let now_s = i64::from(now.time.num_seconds_from_midnight());
        let open_s = i64::from(slot.start_time.num_seconds_from_midnight()) - before.num_seconds();
        let close_s = i64::from(slot.end_time.num_seconds_from_midnight()) + after.num_seconds();

        if now_s < open_s || now_s > close_s {
            return decision(
                false,
                format!(
                    "Journal can only be filled between {} and {} (now {})",
                    clock_label(open_s),
                    clock_label(close_s),
                    now.hhmm()
                ),
            );
        }

        decision(true, "Within the journal window".into())
    }
}

/// `HH:MM` for a second-of-day, clamped to the day.
fn clock_label(seconds: i64) -> String {
    let minutes = seconds.clamp(0, 24 * 3600 - 60) / 60;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Outcome of a timing check, with the lesson's slot for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalTimingDecision {
    pub valid: bool,
    pub reason: String,
    pub schedule_id: i64,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewJournalEntry {
    pub schedule_id: i64,
    pub journal_date: NaiveDate,
    pub topic: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Per-status counts of the attendance session a journal points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub session_id: i64,
    pub present: u64,
    pub sick: u64,
    pub excused: u64,
    pub absent: u64,
}

impl AttendanceSummary {
    pub fn total(&self) -> u64 {
        self.present + self.sick + self.excused + self.absent
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JournalDetail {
    pub journal: teaching_journal::Model,
    /// Absent when the journal was never linked or its session has since been deleted.
    pub attendance: Option<AttendanceSummary>,
}

#[derive(Clone)]
pub struct JournalService {
    db: DatabaseConnection,
    clock: SharedClock,
    policy: TimingPolicy,
}

impl JournalService {
    pub fn new(db: DatabaseConnection, clock: SharedClock, policy: TimingPolicy) -> Self {
        Self { db, clock, policy }
    }

    /// The slot and its assignment, if the slot belongs to `teacher_id` in the active year.
    async fn owned_slot(
        &self,
        schedule_id: i64,
        teacher_id: i64,
    ) -> Result<(schedule::Model, teaching_assignment::Model), AppError> {
        let year = academic::active_academic_year(&self.db).await?;

        let found = schedule::Entity::find_by_id(schedule_id)
            .find_also_related(teaching_assignment::Entity)
            .filter(teaching_assignment::Column::TeacherId.eq(teacher_id))
            .filter(teaching_assignment::Column::AcademicYearId.eq(year.id))
            .one(&self.db)
            .await?;

        match found {
            Some((slot, Some(assignment))) => Ok((slot, assignment)),
            _ => Err(AppError::not_found("Schedule not found or not yours")),
        }
    }

    /// Whether `teacher_id` may write the journal for `schedule_id` right now.
    pub async fn validate(
        &self,
        schedule_id: i64,
        teacher_id: i64,
    ) -> Result<JournalTimingDecision, AppError> {
        let (slot, _) = self.owned_slot(schedule_id, teacher_id).await?;
        Ok(self.policy.decide(&slot, &self.clock.now()))
    }

    pub async fn create_entry(
        &self,
        teacher_id: i64,
        entry: NewJournalEntry,
    ) -> Result<teaching_journal::Model, AppError> {
        let topic = entry.topic.trim();
        if topic.is_empty() {
            return Err(AppError::invalid("Topic is required"));
        }

        let (slot, assignment) = self.owned_slot(entry.schedule_id, teacher_id).await?;
        let now = self.clock.now();

        let decision = self.policy.decide(&slot, &now);
        if !decision.valid {
            return Err(AppError::temporal(decision.reason));
        }
        if entry.journal_date != now.date {
            return Err(AppError::temporal(format!(
                "Journal date must be today ({})",
                now.date
            )));
        }

        let already_created = || {
            AppError::conflict(format!(
                "Journal for this lesson on {} already created",
                entry.journal_date
            ))
        };

        let existing = TeachingJournal::find()
            .filter(teaching_journal::Column::ScheduleId.eq(slot.id))
            .filter(teaching_journal::Column::JournalDate.eq(entry.journal_date))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(already_created());
        }

        let linked_session = attendance_session::Model::find_for_class_on(
            &self.db,
            assignment.class_id,
            entry.journal_date,
        )
        .await?
        .map(|s| s.id);

        let notes = entry
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);

        let journal = teaching_journal::ActiveModel {
            schedule_id: Set(slot.id),
            teacher_id: Set(teacher_id),
            class_id: Set(assignment.class_id),
            journal_date: Set(entry.journal_date),
            topic: Set(topic.to_owned()),
            notes: Set(notes),
            attendance_session_id: Set(linked_session),
            created_at: Set(now.instant),
            ..Default::default()
        };

        match journal.insert(&self.db).await {
            Ok(journal) => {
                tracing::info!(
                    journal_id = journal.id,
                    schedule_id = slot.id,
                    teacher_id,
                    attendance_session_id = ?linked_session,
                    "Teaching journal created"
                );
                Ok(journal)
            }
            Err(e) if is_unique_violation(&e) => Err(already_created()),
            Err(e) => Err(e.into()),
        }
    }

    /// The teacher's journals, newest first, optionally for one date.
    pub async fn list_for_teacher(
        &self,
        teacher_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Vec<teaching_journal::Model>, AppError> {
        let mut query =
            TeachingJournal::find().filter(teaching_journal::Column::TeacherId.eq(teacher_id));
        if let Some(date) = date {
            query = query.filter(teaching_journal::Column::JournalDate.eq(date));
        }
        Ok(query
            .order_by_desc(teaching_journal::Column::JournalDate)
            .order_by_desc(teaching_journal::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn find_for_teacher(
        &self,
        journal_id: i64,
        teacher_id: i64,
    ) -> Result<JournalDetail, AppError> {
        let Some(journal) = TeachingJournal::find_by_id(journal_id)
            .filter(teaching_journal::Column::TeacherId.eq(teacher_id))
            .one(&self.db)
            .await?
        else {
            return Err(AppError::not_found("Journal not found"));
        };

        let attendance = match journal.attendance_session_id {
            Some(session_id) => self.attendance_summary(session_id).await?,
            None => None,
        };
        Ok(JournalDetail {
            journal,
            attendance,
        })
    }

    async fn attendance_summary(
        &self,
        session_id: i64,
    ) -> Result<Option<AttendanceSummary>, AppError> {
        if AttendanceSession::find_by_id(session_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let mut summary = AttendanceSummary {
            session_id,
            ..Default::default()
        };
        for record in attendance_record::Model::find_for_session(&self.db, session_id).await? {
            match record.status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Sick => summary.sick += 1,
                AttendanceStatus::Excused => summary.excused += 1,
                AttendanceStatus::Absent => summary.absent += 1,
            }
        }
        Ok(Some(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::AttendanceManager;
    use chrono::{TimeZone, Utc};
    use db::test_utils::{seed_school, setup_test_db, SchoolFixture};
    use serial_test::serial;
    use std::sync::Arc;
    use util::clock::{offset_from_minutes, Clock, FixedClock};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 8).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> CivilDateTime {
        FixedClock::at_local(
            date,
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            offset_from_minutes(420),
        )
        .now()
    }

    fn clock(date: NaiveDate, h: u32, m: u32) -> SharedClock {
        Arc::new(FixedClock::at_local(
            date,
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            offset_from_minutes(420),
        ))
    }

    fn slot() -> schedule::Model {
        schedule::Model {
            id: 7,
            teaching_assignment_id: 1,
            day_of_week: DayOfWeek::Monday,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            week_type: schedule::WeekType::General,
            room_id: None,
        }
    }

    #[test]
    fn default_window_spans_0730_to_1130() {
        let policy = TimingPolicy::default();
        let slot = slot();

        for (h, m) in [(7, 30), (8, 0), (9, 30), (11, 0), (11, 30)] {
            assert!(policy.decide(&slot, &at(monday(), h, m)).valid, "{h:02}:{m:02}");
        }
        for (h, m) in [(7, 29), (11, 31), (0, 0), (23, 59)] {
            assert!(!policy.decide(&slot, &at(monday(), h, m)).valid, "{h:02}:{m:02}");
        }

        let late = policy.decide(&slot, &at(monday(), 12, 0));
        assert_eq!(
            late.reason,
            "Journal can only be filled between 07:30 and 11:30 (now 12:00)"
        );
    }

    #[test]
    fn wrong_day_names_both_days() {
        let tuesday = monday().succ_opt().unwrap();
        let decision = TimingPolicy::default().decide(&slot(), &at(tuesday, 8, 30));
        assert!(!decision.valid);
        assert!(decision.reason.contains("Monday"));
        assert!(decision.reason.contains("Tuesday"));
    }

    #[test]
    fn always_valid_still_reports_the_slot() {
        let tuesday = monday().succ_opt().unwrap();
        let decision = TimingPolicy::AlwaysValid.decide(&slot(), &at(tuesday, 22, 0));
        assert!(decision.valid);
        assert_eq!(decision.start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(decision.day_of_week, DayOfWeek::Monday);
    }

    #[test]
    fn school_time_not_utc_drives_the_window() {
        // 01:15 UTC Monday is 08:15 in UTC+7.
        let now = FixedClock::new(
            Utc.with_ymd_and_hms(2025, 9, 8, 1, 15, 0).unwrap(),
            offset_from_minutes(420),
        )
        .now();
        assert!(TimingPolicy::default().decide(&slot(), &now).valid);
    }

    #[test]
    #[serial]
    fn production_ignores_the_bypass_flag() {
        config::AppConfig::set_journal_timing_bypass(true);
        config::AppConfig::set_env("development");
        assert_eq!(TimingPolicy::from_config(), TimingPolicy::AlwaysValid);

        config::AppConfig::set_env("production");
        assert!(matches!(
            TimingPolicy::from_config(),
            TimingPolicy::WindowBased { .. }
        ));

        config::AppConfig::set_env("development");
        config::AppConfig::set_journal_timing_bypass(false);
    }

    #[test]
    #[serial]
    fn bad_grace_values_do_not_panic() {
        config::AppConfig::set_journal_grace_minutes(-15, i64::MAX);
        assert_eq!(
            TimingPolicy::from_config(),
            TimingPolicy::WindowBased {
                before: Duration::zero(),
                after: Duration::minutes(120),
            }
        );

        config::AppConfig::set_journal_grace_minutes(0, 0);
        let policy = TimingPolicy::from_config();
        assert!(policy.decide(&slot(), &at(monday(), 8, 0)).valid);
        assert!(!policy.decide(&slot(), &at(monday(), 7, 59)).valid);
        assert!(!policy.decide(&slot(), &at(monday(), 9, 31)).valid);

        config::AppConfig::set_journal_grace_minutes(30, 120);
    }

    async fn setup() -> (DatabaseConnection, SchoolFixture) {
        let db = setup_test_db().await;
        let school = seed_school(&db).await;
        (db, school)
    }

    fn entry(school: &SchoolFixture, date: NaiveDate) -> NewJournalEntry {
        NewJournalEntry {
            schedule_id: school.schedule.id,
            journal_date: date,
            topic: "Quadratic equations".into(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn validate_requires_ownership() {
        let (db, school) = setup().await;
        let service = JournalService::new(db, clock(monday(), 8, 15), TimingPolicy::default());

        let ok = service
            .validate(school.schedule.id, school.teacher.id)
            .await
            .unwrap();
        assert!(ok.valid);

        let err = service
            .validate(school.schedule.id, school.admin.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.to_string(), "Schedule not found or not yours");
    }

    #[tokio::test]
    async fn second_journal_for_the_same_lesson_conflicts() {
        let (db, school) = setup().await;
        let service = JournalService::new(db, clock(monday(), 9, 45), TimingPolicy::default());

        let journal = service
            .create_entry(school.teacher.id, entry(&school, monday()))
            .await
            .unwrap();
        assert_eq!(journal.class_id, school.class.id);
        assert_eq!(journal.attendance_session_id, None);

        let err = service
            .create_entry(school.teacher.id, entry(&school, monday()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "conflict");
        assert!(err.to_string().contains("already created"));
    }

    #[tokio::test]
    async fn journal_cannot_be_backdated_or_late() {
        let (db, school) = setup().await;
        let service = JournalService::new(
            db.clone(),
            clock(monday(), 8, 30),
            TimingPolicy::default(),
        );
        let last_week = monday() - Duration::days(7);
        let err = service
            .create_entry(school.teacher.id, entry(&school, last_week))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "temporal");
        assert!(err.to_string().contains("today"));

        let late = JournalService::new(db, clock(monday(), 13, 0), TimingPolicy::default());
        let err = late
            .create_entry(school.teacher.id, entry(&school, monday()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "temporal");
        assert!(err.to_string().contains("07:30"));
    }

    #[tokio::test]
    async fn journal_links_todays_session_and_summarises_it() {
        let (db, school) = setup().await;
        let now = clock(monday(), 8, 10);
        let attendance = AttendanceManager::new(db.clone(), now.clone(), Duration::hours(3));
        let session = attendance
            .create_or_get_session(school.teacher.id, school.class.id)
            .await
            .unwrap();
        attendance
            .scan(school.students[0].id, &session.token)
            .await
            .unwrap();
        attendance
            .scan(school.students[1].id, &session.token)
            .await
            .unwrap();

        let service = JournalService::new(db, now, TimingPolicy::default());
        let journal = service
            .create_entry(school.teacher.id, entry(&school, monday()))
            .await
            .unwrap();
        assert_eq!(journal.attendance_session_id, Some(session.id));

        let detail = service
            .find_for_teacher(journal.id, school.teacher.id)
            .await
            .unwrap();
        let summary = detail.attendance.unwrap();
        assert_eq!(summary.present, 2);
        assert_eq!(summary.total(), 2);

        // The link is weak: removing the session leaves the journal without a summary.
        attendance.delete_session(session.id).await.unwrap();
        let detail = service
            .find_for_teacher(journal.id, school.teacher.id)
            .await
            .unwrap();
        assert!(detail.attendance.is_none());
        assert_eq!(detail.journal.attendance_session_id, Some(session.id));

        let listed = service
            .list_for_teacher(school.teacher.id, Some(monday()))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert!(service
            .list_for_teacher(school.teacher.id, Some(monday() - Duration::days(1)))
            .await
            .unwrap()
            .is_empty());
    }
}
