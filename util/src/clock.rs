//! School civil time.
//!
//! Every day-of-week and time-window rule works on a [`CivilDateTime`] produced by a
//! [`Clock`]. Nothing in the rule code reads the process clock or the process timezone
//! directly, so the server may run in UTC while the school lives in UTC+7.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Timelike,
    Utc, Weekday,
};
use std::sync::Arc;

/// A point in time as seen on the school's wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDateTime {
    /// The underlying instant.
    pub instant: DateTime<Utc>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub weekday: Weekday,
}

impl CivilDateTime {
    pub fn from_instant(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = instant.with_timezone(&offset);
        Self {
            instant,
            date: local.date_naive(),
            time: local.time(),
            weekday: local.weekday(),
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }

    /// `HH:MM` rendering used in user-facing messages.
    pub fn hhmm(&self) -> String {
        format!("{:02}:{:02}", self.time.hour(), self.time.minute())
    }
}

/// Source of "now" for the rule modules.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Offset of the school's civil time from UTC.
    fn offset(&self) -> FixedOffset;

    fn now(&self) -> CivilDateTime {
        CivilDateTime::from_instant(self.now_utc(), self.offset())
    }

    /// Renders an instant on the school's wall clock.
    fn civil(&self, instant: DateTime<Utc>) -> CivilDateTime {
        CivilDateTime::from_instant(instant, self.offset())
    }
}

pub type SharedClock = Arc<dyn Clock>;

/// Builds a `FixedOffset` from minutes east of UTC, falling back to UTC when out of range.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt).unwrap_or_else(|| {
        tracing::warn!(minutes, "School UTC offset out of range; using UTC");
        Utc.fix()
    })
}

/// System clock viewed through the school's fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SchoolClock {
    offset: FixedOffset,
}

impl SchoolClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn from_offset_minutes(minutes: i32) -> Self {
        Self::new(offset_from_minutes(minutes))
    }
}

impl Clock for SchoolClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// A clock pinned to one instant. Used by tests and by tooling that replays a day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { instant, offset }
    }

    /// Pins the clock to a wall-clock reading in the given offset.
    pub fn at_local(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> Self {
        let utc = date.and_time(time) - Duration::seconds(i64::from(offset.local_minus_utc()));
        Self {
            instant: Utc.from_utc_datetime(&utc),
            offset,
        }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.instant
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}
