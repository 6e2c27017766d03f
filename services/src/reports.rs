//! Read-only attendance views.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use db::models::attendance_record::{self, AttendanceStatus, CaptureMethod};
use db::models::attendance_session;
use db::models::class_student;
use db::models::schedule::{self, DayOfWeek, WeekType};
use db::models::school_class::{self, Entity as SchoolClass};
use db::models::subject::Entity as Subject;
use db::models::teaching_assignment;
use db::models::user::{self, Entity as User};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use util::clock::CivilDateTime;

use crate::academic;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub student_id: i64,
    pub username: String,
    pub full_name: String,
    /// `None` while unmarked.
    pub status: Option<AttendanceStatus>,
    pub method: Option<CaptureMethod>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassToday {
    pub class: school_class::Model,
    pub date: NaiveDate,
    pub session: Option<attendance_session::Model>,
    pub students: Vec<RosterEntry>,
    pub marked: usize,
    pub unmarked: usize,
}

/// Today's roster of a class with each student's record, if any.
pub async fn class_today<C>(db: &C, today: NaiveDate, class_id: i64) -> Result<ClassToday, AppError>
where
    C: ConnectionTrait,
{
    let Some(class) = SchoolClass::find_by_id(class_id).one(db).await? else {
        return Err(AppError::not_found(format!("Class {class_id} not found")));
    };
    let year = academic::active_academic_year(db).await?;

    let session = attendance_session::Model::find_for_class_on(db, class.id, today).await?;
    let student_ids = class_student::Model::student_ids(db, class.id, year.id).await?;
    let students = User::find()
        .filter(user::Column::Id.is_in(student_ids))
        .order_by_asc(user::Column::FullName)
        .all(db)
        .await?;

    let mut records = todays_records(db, class.id, today, session.as_ref()).await?;

    let students: Vec<RosterEntry> = students
        .into_iter()
        .map(|s| {
            let record = records.remove(&s.id);
            RosterEntry {
                student_id: s.id,
                username: s.username,
                full_name: s.full_name,
                status: record.as_ref().map(|r| r.status),
                method: record.as_ref().map(|r| r.method),
                recorded_at: record.as_ref().map(|r| r.recorded_at),
                notes: record.and_then(|r| r.notes),
            }
        })
        .collect();

    let marked = students.iter().filter(|s| s.status.is_some()).count();
    let unmarked = students.len() - marked;

    Ok(ClassToday {
        class,
        date: today,
        session,
        students,
        marked,
        unmarked,
    })
}

/// Today's record per student of a class.
///
/// Scoped to the open session when there is one. Without a session, records left by
/// deleted sessions are used, latest `recorded_at` winning per student.
async fn todays_records<C>(
    db: &C,
    class_id: i64,
    date: NaiveDate,
    session: Option<&attendance_session::Model>,
) -> Result<HashMap<i64, attendance_record::Model>, AppError>
where
    C: ConnectionTrait,
{
    let query = match session {
        Some(session) => attendance_record::Entity::find()
            .filter(attendance_record::Column::SessionId.eq(session.id)),
        None => attendance_record::Entity::find()
            .filter(attendance_record::Column::ClassId.eq(class_id))
            .filter(attendance_record::Column::SessionDate.eq(date)),
    };

    Ok(query
        .order_by_asc(attendance_record::Column::RecordedAt)
        .order_by_asc(attendance_record::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.student_id, r))
        .collect())
}

/// A student's records, newest first. Read from the records themselves, so entries
/// survive deletion of their session.
pub async fn student_history<C>(
    db: &C,
    student_id: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<attendance_record::Model>, AppError>
where
    C: ConnectionTrait,
{
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::invalid("`from` must not be after `to`"));
        }
    }

    let mut query = attendance_record::Entity::find()
        .filter(attendance_record::Column::StudentId.eq(student_id));
    if let Some(from) = from {
        query = query.filter(attendance_record::Column::SessionDate.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(attendance_record::Column::SessionDate.lte(to));
    }

    Ok(query
        .order_by_desc(attendance_record::Column::SessionDate)
        .order_by_desc(attendance_record::Column::RecordedAt)
        .all(db)
        .await?)
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherLesson {
    pub schedule_id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub subject_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub week_type: WeekType,
    pub session_id: Option<i64>,
    pub present: u64,
    pub enrolled: usize,
}

/// The teacher's lessons today that run in the active rotation week, in start order.
pub async fn teacher_today<C>(
    db: &C,
    now: &CivilDateTime,
    teacher_id: i64,
) -> Result<Vec<TeacherLesson>, AppError>
where
    C: ConnectionTrait,
{
    let year = academic::active_academic_year(db).await?;

    let slots = schedule::Entity::find()
        .find_also_related(teaching_assignment::Entity)
        .filter(teaching_assignment::Column::TeacherId.eq(teacher_id))
        .filter(teaching_assignment::Column::AcademicYearId.eq(year.id))
        .filter(schedule::Column::DayOfWeek.eq(DayOfWeek::from(now.weekday)))
        .order_by_asc(schedule::Column::StartTime)
        .all(db)
        .await?;

    let mut lessons = Vec::with_capacity(slots.len());
    for (slot, assignment) in slots {
        let Some(assignment) = assignment else {
            continue;
        };
        let Some(class) = SchoolClass::find_by_id(assignment.class_id).one(db).await? else {
            continue;
        };

        if let Some(week) = academic::active_week_for(db, class.grade, year.id).await? {
            if !slot.week_type.runs_during(week.week_type) {
                continue;
            }
        }

        let subject_name = Subject::find_by_id(assignment.subject_id)
            .one(db)
            .await?
            .map(|s| s.name)
            .unwrap_or_default();
        let session = attendance_session::Model::find_for_class_on(db, class.id, now.date).await?;
        let present = todays_records(db, class.id, now.date, session.as_ref())
            .await?
            .values()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count() as u64;
        let enrolled = class_student::Model::student_ids(db, class.id, year.id)
            .await?
            .len();

        lessons.push(TeacherLesson {
            schedule_id: slot.id,
            class_id: class.id,
            class_name: class.name,
            subject_name,
            start_time: slot.start_time,
            end_time: slot.end_time,
            week_type: slot.week_type,
            session_id: session.map(|s| s.id),
            present,
            enrolled,
        });
    }
    Ok(lessons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::{AttendanceManager, ManualEntry};
    use chrono::Duration;
    use db::test_utils::{seed_school, setup_test_db};
    use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
    use std::sync::Arc;
    use util::clock::{offset_from_minutes, Clock, FixedClock};

    fn monday_clock() -> FixedClock {
        FixedClock::at_local(
            NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            offset_from_minutes(420),
        )
    }

    #[tokio::test]
    async fn roster_splits_marked_and_unmarked() {
        let db = setup_test_db().await;
        let school = seed_school(&db).await;
        let clock = monday_clock();
        let manager = AttendanceManager::new(db.clone(), Arc::new(clock), Duration::hours(3));
        let session = manager
            .create_or_get_session(school.teacher.id, school.class.id)
            .await
            .unwrap();
        manager.scan(school.students[0].id, &session.token).await.unwrap();
        manager
            .mark_batch_manual(
                school.class.id,
                &[ManualEntry {
                    student_id: school.students[1].id,
                    status: AttendanceStatus::Sick,
                    notes: Some("fever".into()),
                }],
            )
            .await
            .unwrap();

        let today = class_today(&db, clock.now().date, school.class.id).await.unwrap();
        assert_eq!(today.session.map(|s| s.id), Some(session.id));
        assert_eq!(today.students.len(), 6);
        assert_eq!(today.marked, 2);
        assert_eq!(today.unmarked, 4);
        let sick = today
            .students
            .iter()
            .find(|s| s.student_id == school.students[1].id)
            .unwrap();
        assert_eq!(sick.status, Some(AttendanceStatus::Sick));
        assert_eq!(sick.notes.as_deref(), Some("fever"));
    }

    #[tokio::test]
    async fn history_survives_session_deletion_and_filters_by_date() {
        let db = setup_test_db().await;
        let school = seed_school(&db).await;
        let clock = monday_clock();
        let manager = AttendanceManager::new(db.clone(), Arc::new(clock), Duration::hours(3));
        let session = manager
            .create_or_get_session(school.teacher.id, school.class.id)
            .await
            .unwrap();
        let student = school.students[0].id;
        manager.scan(student, &session.token).await.unwrap();
        manager.delete_session(session.id).await.unwrap();

        let monday = clock.now().date;
        let history = student_history(&db, student, None, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].session_date, monday);

        let later = student_history(&db, student, Some(monday.succ_opt().unwrap()), None)
            .await
            .unwrap();
        assert!(later.is_empty());

        let err = student_history(&db, student, Some(monday), monday.pred_opt())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid");
    }

    #[tokio::test]
    async fn teacher_today_follows_the_rotation() {
        let db = setup_test_db().await;
        let school = seed_school(&db).await;
        let clock = monday_clock();

        let lessons = teacher_today(&db, &clock.now(), school.teacher.id).await.unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].class_name, "XII RPL 1");
        assert_eq!(lessons[0].subject_name, "Matematika");
        assert_eq!(lessons[0].enrolled, 6);
        assert_eq!(lessons[0].session_id, None);

        let manager = AttendanceManager::new(db.clone(), Arc::new(clock), Duration::hours(3));
        let session = manager
            .create_or_get_session(school.teacher.id, school.class.id)
            .await
            .unwrap();
        manager.scan(school.students[2].id, &session.token).await.unwrap();
        let lessons = teacher_today(&db, &clock.now(), school.teacher.id).await.unwrap();
        assert_eq!(lessons[0].session_id, Some(session.id));
        assert_eq!(lessons[0].present, 1);

        let mut slot = school.schedule.clone().into_active_model();
        slot.week_type = Set(WeekType::B);
        slot.update(&db).await.unwrap();
        academic::set_active_week(&db, 12, WeekType::A).await.unwrap();
        assert!(teacher_today(&db, &clock.now(), school.teacher.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn reopened_session_counts_each_student_once() {
        let db = setup_test_db().await;
        let school = seed_school(&db).await;
        let clock = monday_clock();
        let manager = AttendanceManager::new(db.clone(), Arc::new(clock), Duration::hours(3));
        let student = school.students[0].id;

        let first = manager
            .create_or_get_session(school.teacher.id, school.class.id)
            .await
            .unwrap();
        manager.scan(student, &first.token).await.unwrap();
        manager.delete_session(first.id).await.unwrap();

        // With no session open, the kept record still shows.
        let today = class_today(&db, clock.now().date, school.class.id).await.unwrap();
        assert!(today.session.is_none());
        assert_eq!(today.marked, 1);

        let second = manager
            .create_or_get_session(school.teacher.id, school.class.id)
            .await
            .unwrap();
        assert_ne!(second.id, first.id);
        let rescan = manager.scan(student, &second.token).await.unwrap();

        let lessons = teacher_today(&db, &clock.now(), school.teacher.id).await.unwrap();
        assert_eq!(lessons[0].session_id, Some(second.id));
        assert_eq!(lessons[0].present, 1);

        let today = class_today(&db, clock.now().date, school.class.id).await.unwrap();
        assert_eq!(today.marked, 1);
        let entry = today
            .students
            .iter()
            .find(|s| s.student_id == student)
            .unwrap();
        assert_eq!(entry.recorded_at, Some(rescan.recorded_at));

        // History keeps both rows.
        assert_eq!(student_history(&db, student, None, None).await.unwrap().len(), 2);
    }
}
