pub mod academic_year;
pub mod active_week;
pub mod catalog;
pub mod schedule;
pub mod school_class;
pub mod user;
