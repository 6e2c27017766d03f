pub mod academic_year;
pub mod active_schedule_week;
pub mod attendance_record;
pub mod attendance_session;
pub mod class_student;
pub mod major;
pub mod room;
pub mod schedule;
pub mod school_class;
pub mod subject;
pub mod teaching_assignment;
pub mod teaching_journal;
pub mod user;

pub use academic_year::Entity as AcademicYear;
pub use active_schedule_week::Entity as ActiveScheduleWeek;
pub use attendance_record::Entity as AttendanceRecord;
pub use attendance_session::Entity as AttendanceSession;
pub use school_class::Entity as SchoolClass;
pub use schedule::Entity as Schedule;
pub use teaching_journal::Entity as TeachingJournal;
pub use user::Entity as User;
