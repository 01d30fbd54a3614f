//! Local calendar used to bucket sessions into days.
//!
//! Streaks and active-day counts are defined over the learner's local date,
//! not over UTC instants. The offset is fixed per evaluation so that the same
//! history always lands in the same buckets.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

use crate::error::ConfigError;

/// Maps instants to local calendar dates using a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalCalendar {
    offset: FixedOffset,
}

impl Default for LocalCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl LocalCalendar {
    /// Calendar whose days are UTC days.
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Calendar for a fixed offset east of UTC, in minutes.
    ///
    /// # Errors
    /// Returns an error if the offset is not strictly within +/- 24 hours.
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, ConfigError> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "calendar.utc_offset_minutes".to_string(),
                message: format!("{minutes} is outside the +/-1439 minute range"),
            })?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local date of an instant.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Local date of "now".
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.day_of(now)
    }

    /// First instant of a local date, expressed in UTC.
    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        let midnight = day.and_time(chrono::NaiveTime::MIN);
        // A fixed offset has no gaps or folds, so the mapping is always single.
        self.offset
            .from_local_datetime(&midnight)
            .single()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
    }
}
