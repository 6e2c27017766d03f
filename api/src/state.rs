use std::sync::Arc;

use chrono::Duration;
use sea_orm::DatabaseConnection;
use services::attendance::AttendanceManager;
use services::journal::{JournalService, TimingPolicy};
use util::clock::{SchoolClock, SharedClock};
use util::config;

/// Shared handler state: the connection pool, the school clock and the two rule services
/// built on top of them.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    clock: SharedClock,
    attendance: AttendanceManager,
    journals: JournalService,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        clock: SharedClock,
        session_ttl: Duration,
        policy: TimingPolicy,
    ) -> Self {
        Self {
            attendance: AttendanceManager::new(db.clone(), clock.clone(), session_ttl),
            journals: JournalService::new(db.clone(), clock.clone(), policy),
            db,
            clock,
        }
    }

    /// State wired from the global configuration with the system clock.
    pub fn from_config(db: DatabaseConnection) -> Self {
        let clock: SharedClock = Arc::new(SchoolClock::from_offset_minutes(
            config::school_utc_offset_minutes(),
        ));
        Self::new(db, clock, session_ttl(), TimingPolicy::from_config())
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn attendance(&self) -> &AttendanceManager {
        &self.attendance
    }

    pub fn journals(&self) -> &JournalService {
        &self.journals
    }
}

const DEFAULT_SESSION_MINUTES: i64 = 180;

/// `ATTENDANCE_SESSION_MINUTES` as a duration. Non-positive or unrepresentable values
/// fall back to the default.
fn session_ttl() -> Duration {
    let minutes = config::attendance_session_minutes();
    match Duration::try_minutes(minutes) {
        Some(ttl) if minutes > 0 => ttl,
        _ => {
            tracing::warn!(
                minutes,
                default = DEFAULT_SESSION_MINUTES,
                "ATTENDANCE_SESSION_MINUTES out of range; using default"
            );
            Duration::minutes(DEFAULT_SESSION_MINUTES)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;
    use serial_test::serial;
    use util::clock::Clock;

    #[test]
    #[serial]
    fn session_ttl_falls_back_on_bad_values() {
        config::AppConfig::set_attendance_session_minutes(45);
        assert_eq!(session_ttl(), Duration::minutes(45));

        for bad in [0, -30, i64::MAX] {
            config::AppConfig::set_attendance_session_minutes(bad);
            assert_eq!(session_ttl(), Duration::minutes(180), "{bad}");
        }

        config::AppConfig::set_attendance_session_minutes(180);
    }

    #[tokio::test]
    #[serial]
    async fn from_config_survives_an_overflowing_offset() {
        config::AppConfig::set_school_utc_offset_minutes(i32::MAX);
        let state = AppState::from_config(setup_test_db().await);
        assert_eq!(state.clock().offset().local_minus_utc(), 0);

        config::AppConfig::set_school_utc_offset_minutes(420);
        let state = AppState::from_config(setup_test_db().await);
        assert_eq!(state.clock().offset().local_minus_utc(), 420 * 60);
    }
}
