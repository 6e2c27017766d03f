//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Secret used outside production when `JWT_SECRET` is not provided.
const DEV_JWT_SECRET: &str = "school-portal-dev-secret";

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    /// Offset of the school's civil time from UTC, in minutes (UTC+7 => 420).
    pub school_utc_offset_minutes: i32,
    /// Lifetime of an attendance session, counted from creation or token regeneration.
    pub attendance_session_minutes: i64,
    pub journal_grace_before_minutes: i64,
    pub journal_grace_after_minutes: i64,
    /// Requests the always-valid journal timing policy. Ignored in production.
    pub journal_timing_bypass: bool,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Panics if `JWT_SECRET` is missing while `APP_ENV=production`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if env.eq_ignore_ascii_case("production") => {
                panic!("JWT_SECRET is required in production")
            }
            Err(_) => DEV_JWT_SECRET.into(),
        };

        Self {
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "school-portal".into()),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "api=info,services=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "data/school.db".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: var_or("PORT", 3000),
            jwt_secret,
            jwt_duration_minutes: var_or("JWT_DURATION_MINUTES", 60),
            school_utc_offset_minutes: var_or("SCHOOL_UTC_OFFSET_MINUTES", 7 * 60),
            attendance_session_minutes: var_or("ATTENDANCE_SESSION_MINUTES", 180),
            journal_grace_before_minutes: var_or("JOURNAL_GRACE_BEFORE_MINUTES", 30),
            journal_grace_after_minutes: var_or("JOURNAL_GRACE_AFTER_MINUTES", 120),
            journal_timing_bypass: env::var("JOURNAL_TIMING_BYPASS")
                .unwrap_or_else(|_| "false".into())
                == "true",
            env,
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_school_utc_offset_minutes(value: i32) {
        AppConfig::set_field(|cfg| cfg.school_utc_offset_minutes = value);
    }

    pub fn set_attendance_session_minutes(value: i64) {
        AppConfig::set_field(|cfg| cfg.attendance_session_minutes = value);
    }

    pub fn set_journal_grace_minutes(before: i64, after: i64) {
        AppConfig::set_field(|cfg| {
            cfg.journal_grace_before_minutes = before;
            cfg.journal_grace_after_minutes = after;
        });
    }

    pub fn set_journal_timing_bypass(value: bool) {
        AppConfig::set_field(|cfg| cfg.journal_timing_bypass = value);
    }
}

// --- Free accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn school_utc_offset_minutes() -> i32 {
    AppConfig::global().school_utc_offset_minutes
}

pub fn attendance_session_minutes() -> i64 {
    AppConfig::global().attendance_session_minutes
}

pub fn journal_grace_before_minutes() -> i64 {
    AppConfig::global().journal_grace_before_minutes
}

pub fn journal_grace_after_minutes() -> i64 {
    AppConfig::global().journal_grace_after_minutes
}

pub fn journal_timing_bypass() -> bool {
    AppConfig::global().journal_timing_bypass
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_describe_the_school_day() {
        unsafe {
            env::remove_var("SCHOOL_UTC_OFFSET_MINUTES");
            env::remove_var("ATTENDANCE_SESSION_MINUTES");
            env::remove_var("JOURNAL_GRACE_BEFORE_MINUTES");
            env::remove_var("JOURNAL_GRACE_AFTER_MINUTES");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.school_utc_offset_minutes, 420);
        assert_eq!(cfg.attendance_session_minutes, 180);
        assert_eq!(cfg.journal_grace_before_minutes, 30);
        assert_eq!(cfg.journal_grace_after_minutes, 120);
    }

    #[test]
    #[serial]
    fn malformed_numbers_fall_back_to_defaults() {
        unsafe {
            env::set_var("ATTENDANCE_SESSION_MINUTES", "three hours");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.attendance_session_minutes, 180);
        unsafe {
            env::remove_var("ATTENDANCE_SESSION_MINUTES");
        }
    }
}
