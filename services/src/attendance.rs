//! Daily QR attendance sessions.
//!
//! One session per (class, civil date). Students check in by scanning the session token;
//! supervisors correct the roster with batch manual entries. Deleting a session leaves the
//! records it collected in place.

use chrono::Duration;
use db::models::attendance_record::{self, AttendanceStatus, CaptureMethod};
use db::models::attendance_session::{self, Entity as AttendanceSession};
use db::models::class_student;
use db::models::schedule::{self, DayOfWeek, WeekType};
use db::models::school_class::{self, Entity as SchoolClass};
use db::models::teaching_assignment;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, JoinType, QueryFilter, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use util::clock::{CivilDateTime, SharedClock};

use crate::academic;
use crate::error::{is_unique_violation, AppError};

/// One line of a manual attendance batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Creates, scans, corrects and retires attendance sessions.
#[derive(Clone)]
pub struct AttendanceManager {
    db: DatabaseConnection,
    clock: SharedClock,
    session_ttl: Duration,
}

impl AttendanceManager {
    /// `session_ttl` is counted from creation and from every token regeneration.
    pub fn new(db: DatabaseConnection, clock: SharedClock, session_ttl: Duration) -> Self {
        Self {
            db,
            clock,
            session_ttl,
        }
    }

    /// Returns today's session for the class, opening it on first request.
    ///
    /// An existing session is returned untouched: same token, same expiry.
    pub async fn create_or_get_session(
        &self,
        creator_id: i64,
        class_id: i64,
    ) -> Result<attendance_session::Model, AppError> {
        let now = self.clock.now();
        if now.is_weekend() {
            return Err(AppError::ineligible(format!(
                "Attendance is not taken on {}",
                DayOfWeek::from(now.weekday).label()
            )));
        }

        let year = academic::active_academic_year(&self.db).await?;
        let Some(class) = SchoolClass::find_by_id(class_id).one(&self.db).await? else {
            return Err(AppError::not_found(format!("Class {class_id} not found")));
        };

        self.ensure_in_rotation(&class, year.id, &now).await?;

        if let Some(existing) =
            attendance_session::Model::find_for_class_on(&self.db, class.id, now.date).await?
        {
            return Ok(existing);
        }

        let new_session = attendance_session::ActiveModel {
            class_id: Set(class.id),
            session_date: Set(now.date),
            token: Set(attendance_session::Model::generate_token()),
            expires_at: Set(now.instant + self.session_ttl),
            created_by: Set(creator_id),
            academic_year_id: Set(year.id),
            created_at: Set(now.instant),
            ..Default::default()
        };

        match new_session.insert(&self.db).await {
            Ok(session) => {
                tracing::info!(
                    session_id = session.id,
                    class_id = class.id,
                    date = %session.session_date,
                    created_by = creator_id,
                    "Attendance session opened"
                );
                Ok(session)
            }
            // Another request opened it first.
            Err(e) if is_unique_violation(&e) => {
                attendance_session::Model::find_for_class_on(&self.db, class.id, now.date)
                    .await?
                    .ok_or(AppError::Database(e))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// When the grade runs an A/B rotation, the class needs a slot today that belongs to
    /// the active week (or to no rotation at all).
    async fn ensure_in_rotation(
        &self,
        class: &school_class::Model,
        academic_year_id: i64,
        now: &CivilDateTime,
    ) -> Result<(), AppError> {
        let Some(active_week) =
            academic::active_week_for(&self.db, class.grade, academic_year_id).await?
        else {
            return Ok(());
        };
        if active_week.week_type == WeekType::General {
            return Ok(());
        }

        let today_slots = schedule::Entity::find()
            .join(
                JoinType::InnerJoin,
                schedule::Relation::TeachingAssignment.def(),
            )
            .filter(teaching_assignment::Column::ClassId.eq(class.id))
            .filter(teaching_assignment::Column::AcademicYearId.eq(academic_year_id))
            .filter(schedule::Column::DayOfWeek.eq(DayOfWeek::from(now.weekday)))
            .all(&self.db)
            .await?;

        if today_slots
            .iter()
            .any(|slot| slot.week_type.runs_during(active_week.week_type))
        {
            Ok(())
        } else {
            Err(AppError::ineligible(format!(
                "No active schedule for class {} today (week {} is active)",
                class.name,
                active_week.week_type.to_string().to_uppercase()
            )))
        }
    }

    /// Records the caller as present for the session behind `token`.
    pub async fn scan(
        &self,
        student_id: i64,
        token: &str,
    ) -> Result<attendance_record::Model, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::invalid("Attendance token is required"));
        }

        let Some(session) = attendance_session::Model::find_by_token(&self.db, token).await?
        else {
            return Err(AppError::not_found("Invalid attendance token"));
        };

        let now = self.clock.now();
        if session.session_date != now.date {
            return Err(AppError::temporal(format!(
                "This attendance token is for {}, not today",
                session.session_date
            )));
        }
        if session.is_expired_at(now.instant) {
            return Err(AppError::temporal(format!(
                "Attendance session expired at {}",
                self.clock.civil(session.expires_at).hhmm()
            )));
        }

        let year = academic::active_academic_year(&self.db).await?;
        if !class_student::Model::is_enrolled(&self.db, session.class_id, student_id, year.id)
            .await?
        {
            let class_name = SchoolClass::find_by_id(session.class_id)
                .one(&self.db)
                .await?
                .map(|c| c.name)
                .unwrap_or_else(|| format!("#{}", session.class_id));
            return Err(AppError::ineligible(format!(
                "You are not a student of class {class_name}"
            )));
        }

        let record = attendance_record::ActiveModel {
            session_id: Set(session.id),
            class_id: Set(session.class_id),
            session_date: Set(session.session_date),
            student_id: Set(student_id),
            status: Set(AttendanceStatus::Present),
            method: Set(CaptureMethod::Scan),
            recorded_at: Set(now.instant),
            notes: Set(None),
            ..Default::default()
        };

        match record.insert(&self.db).await {
            Ok(record) => {
                tracing::info!(
                    session_id = session.id,
                    student_id,
                    "Attendance scanned"
                );
                Ok(record)
            }
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::conflict("Attendance already recorded today"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Upserts one record per entry against today's session of the class.
    ///
    /// The batch is applied in one transaction; any failing entry rolls back all of them.
    /// Returns the number of entries applied.
    pub async fn mark_batch_manual(
        &self,
        class_id: i64,
        entries: &[ManualEntry],
    ) -> Result<usize, AppError> {
        if entries.is_empty() {
            return Err(AppError::invalid("At least one attendance entry is required"));
        }

        let now = self.clock.now();
        let Some(session) =
            attendance_session::Model::find_for_class_on(&self.db, class_id, now.date).await?
        else {
            return Err(AppError::not_found(
                "No attendance session has been opened for this class today",
            ));
        };
        let year = academic::active_academic_year(&self.db).await?;

        let txn = self.db.begin().await?;
        if let Err(e) = apply_manual_batch(&txn, &session, year.id, entries, &now).await {
            txn.rollback().await?;
            return Err(e);
        }
        txn.commit().await?;

        tracing::info!(
            session_id = session.id,
            class_id,
            count = entries.len(),
            "Manual attendance applied"
        );
        Ok(entries.len())
    }

    /// Issues a fresh token and pushes the expiry to now + TTL. Records are kept.
    pub async fn regenerate_token(
        &self,
        session_id: i64,
    ) -> Result<attendance_session::Model, AppError> {
        let Some(session) = AttendanceSession::find_by_id(session_id).one(&self.db).await? else {
            return Err(AppError::not_found("Attendance session not found"));
        };

        let now = self.clock.now();
        let mut active = session.into_active_model();
        active.token = Set(attendance_session::Model::generate_token());
        active.expires_at = Set(now.instant + self.session_ttl);
        let session = active.update(&self.db).await?;

        tracing::info!(session_id, "Attendance token regenerated");
        Ok(session)
    }

    /// Removes the session row only.
    pub async fn delete_session(&self, session_id: i64) -> Result<(), AppError> {
        let result = AttendanceSession::delete_by_id(session_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Attendance session not found"));
        }
        tracing::info!(session_id, "Attendance session deleted");
        Ok(())
    }
}

async fn apply_manual_batch<C>(
    db: &C,
    session: &attendance_session::Model,
    academic_year_id: i64,
    entries: &[ManualEntry],
    now: &CivilDateTime,
) -> Result<(), AppError>
where
    C: ConnectionTrait,
{
    for (idx, entry) in entries.iter().enumerate() {
        if !class_student::Model::is_enrolled(db, session.class_id, entry.student_id, academic_year_id)
            .await?
        {
            return Err(AppError::invalid(format!(
                "Entry {}: student {} is not enrolled in this class",
                idx + 1,
                entry.student_id
            )));
        }
        upsert_manual(db, session, entry, now).await?;
    }
    Ok(())
}

async fn upsert_manual<C>(
    db: &C,
    session: &attendance_session::Model,
    entry: &ManualEntry,
    now: &CivilDateTime,
) -> Result<attendance_record::Model, AppError>
where
    C: ConnectionTrait,
{
    let notes = entry
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned);

    let existing = attendance_record::Entity::find()
        .filter(attendance_record::Column::SessionId.eq(session.id))
        .filter(attendance_record::Column::StudentId.eq(entry.student_id))
        .one(db)
        .await?;

    let saved = match existing {
        Some(record) => {
            let mut active = record.into_active_model();
            active.status = Set(entry.status);
            active.method = Set(CaptureMethod::Manual);
            active.recorded_at = Set(now.instant);
            active.notes = Set(notes);
            active.update(db).await?
        }
        None => {
            attendance_record::ActiveModel {
                session_id: Set(session.id),
                class_id: Set(session.class_id),
                session_date: Set(session.session_date),
                student_id: Set(entry.student_id),
                status: Set(entry.status),
                method: Set(CaptureMethod::Manual),
                recorded_at: Set(now.instant),
                notes: Set(notes),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };
    Ok(saved)
}
