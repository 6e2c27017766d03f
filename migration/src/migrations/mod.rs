pub mod m202601050001_create_users;
pub mod m202601050002_create_academic_years;
pub mod m202601050003_create_catalog;
pub mod m202601050004_create_classes;
pub mod m202601050005_create_schedules;
pub mod m202601050006_create_attendance;
pub mod m202601050007_create_teaching_journals;
