mod academic_test;
mod attendance_test;
mod health_test;
mod journals_test;
