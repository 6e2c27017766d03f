use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Failure of a domain operation.
///
/// Every variant except `Database` carries a message meant for the end user.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session, schedule, class, year or student is absent or not owned by the caller.
    #[error("{0}")]
    NotFound(String),

    /// Wrong day, outside the allowed window, expired, or not today.
    #[error("{0}")]
    Temporal(String),

    /// Weekend, or the class is not in this week's rotation.
    #[error("{0}")]
    Ineligible(String),

    /// Duplicate scan, duplicate journal, duplicate name.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AppError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Temporal(_) => "temporal",
            AppError::Ineligible(_) => "ineligible",
            AppError::Conflict(_) => "conflict",
            AppError::Invalid(_) => "invalid",
            AppError::Database(_) => "database",
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn temporal(msg: impl Into<String>) -> Self {
        AppError::Temporal(msg.into())
    }

    pub fn ineligible(msg: impl Into<String>) -> Self {
        AppError::Ineligible(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::Invalid(msg.into())
    }
}

/// True when the store rejected a write because of a unique index.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
