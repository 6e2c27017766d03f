use chrono::NaiveTime;
use migration::Migrator;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::models::schedule::{DayOfWeek, WeekType};
use crate::models::user::UserRole;
use crate::models::{
    academic_year, class_student, major, schedule, school_class, subject, teaching_assignment,
    user,
};

/// Fresh, fully migrated in-memory SQLite database with foreign keys enforced.
///
/// The pool is pinned to a single connection: every SQLite `:memory:` connection is its
/// own database.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to in-memory db");

    db.execute_unprepared("PRAGMA foreign_keys = ON")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// A small school: one active year, a grade-12 class with six students and a general
/// Monday 08:00-09:30 lesson, plus a grade-11 class holding one other student.
pub struct SchoolFixture {
    pub admin: user::Model,
    pub teacher: user::Model,
    pub students: Vec<user::Model>,
    /// Enrolled in `other_class`, not in `class`.
    pub outsider: user::Model,
    pub year: academic_year::Model,
    pub class: school_class::Model,
    pub other_class: school_class::Model,
    pub subject: subject::Model,
    pub assignment: teaching_assignment::Model,
    pub schedule: schedule::Model,
}

pub async fn seed_school<C: ConnectionTrait>(db: &C) -> SchoolFixture {
    let admin = user::Model::create(db, "admin", "School Admin", UserRole::Admin)
        .await
        .expect("admin");
    let teacher = user::Model::create(db, "T001", "Siti Rahma", UserRole::Teacher)
        .await
        .expect("teacher");
    let year = academic_year::Model::create(db, "2025/2026", true)
        .await
        .expect("year");
    let major = major::Model::create(db, "RPL", "Rekayasa Perangkat Lunak")
        .await
        .expect("major");
    let class = school_class::Model::create(db, "XII RPL 1", 12, Some(major.id), Some(teacher.id))
        .await
        .expect("class");
    let other_class = school_class::Model::create(db, "XI TKJ 1", 11, None, None)
        .await
        .expect("other class");

    let mut students = Vec::new();
    for n in 1..=6 {
        let student = user::Model::create(
            db,
            &format!("S{n:03}"),
            &format!("Student {n}"),
            UserRole::Student,
        )
        .await
        .expect("student");
        class_student::Model::enroll(db, class.id, student.id, year.id)
            .await
            .expect("enrol");
        students.push(student);
    }
    let outsider = user::Model::create(db, "S100", "Other Student", UserRole::Student)
        .await
        .expect("outsider");
    class_student::Model::enroll(db, other_class.id, outsider.id, year.id)
        .await
        .expect("enrol outsider");

    let subject = subject::Model::create(db, "MTK", "Matematika")
        .await
        .expect("subject");
    let assignment =
        teaching_assignment::Model::create(db, teacher.id, subject.id, class.id, year.id)
            .await
            .expect("assignment");
    let schedule = schedule::Model::create(
        db,
        assignment.id,
        DayOfWeek::Monday,
        NaiveTime::from_hms_opt(8, 0, 0).expect("time"),
        NaiveTime::from_hms_opt(9, 30, 0).expect("time"),
        WeekType::General,
        None,
    )
    .await
    .expect("schedule");

    SchoolFixture {
        admin,
        teacher,
        students,
        outsider,
        year,
        class,
        other_class,
        subject,
        assignment,
        schedule,
    }
}
