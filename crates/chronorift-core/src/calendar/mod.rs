//! Civil calendar view of UTC instants.
//!
//! Every rule in the rotation ("22:00 local", "Thursday 04:00 local") is
//! phrased in the civil time of a daylight-saving-observing zone. This module
//! is the only place that converts between UTC instants and that civil
//! calendar, using the zone's real offset for each date.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::ConfigError;

/// Civil hour and weekday of an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalHour {
    /// Hour of day, 0..=23.
    pub hour: u32,
    pub weekday: Weekday,
    /// Civil date the instant falls on.
    pub date: NaiveDate,
}

/// Classifies instants in a fixed IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalCalendar {
    tz: Tz,
}

impl LocalCalendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build a calendar from an IANA zone name such as `America/New_York`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTimezone`] when the name is not in the
    /// bundled zone database. There is no fixed-offset fallback.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Civil hour and weekday of `instant` in this zone.
    pub fn classify(&self, instant: DateTime<Utc>) -> LocalHour {
        let local = instant.with_timezone(&self.tz);
        LocalHour {
            hour: local.hour(),
            weekday: local.weekday(),
            date: local.date_naive(),
        }
    }

    /// Civil date of `instant` in this zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// The instant at which the wall clock reads `hour:00` on `date`.
    ///
    /// Repeated wall-clock times (autumn fall-back) resolve to the earlier
    /// instant. Skipped wall-clock times (spring gap) are read with the offset
    /// in force before the gap, which lands on the first valid instant after it.
    pub fn local_instant(&self, date: NaiveDate, hour: u32) -> DateTime<Utc> {
        let naive = date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour));
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => self.resolve_gap(naive),
        }
    }

    fn resolve_gap(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        let offset = self
            .tz
            .offset_from_utc_datetime(&(naive - Duration::days(1)))
            .fix();
        let utc = naive - Duration::seconds(i64::from(offset.local_minus_utc()));
        DateTime::from_naive_utc_and_offset(utc, Utc)
    }
}

impl Default for LocalCalendar {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}
