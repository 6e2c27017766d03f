//! Domain rules of the school portal.
//!
//! [`attendance::AttendanceManager`] owns the daily QR session lifecycle and
//! [`journal::JournalService`] owns teaching journals and their timing window. Both read
//! "now" from an injected [`util::clock::Clock`] and fail with [`error::AppError`].

pub mod academic;
pub mod attendance;
pub mod error;
pub mod journal;
pub mod reports;

pub use error::AppError;
