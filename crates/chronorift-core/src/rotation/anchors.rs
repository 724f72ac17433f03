//! Weekly re-anchor events.
//!
//! Once a week, at a fixed local wall-clock time (Thursday 04:00 by default),
//! the rotation's daily starting slot shifts one extra step backward. The
//! counter answers "how many of those events lie in this interval" in
//! constant time, using day-number arithmetic on civil dates instead of
//! walking the interval day by day.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calendar::LocalCalendar;

/// Local wall-clock time of the weekly re-anchor event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRule {
    pub weekday: Weekday,
    /// Local hour, 0..=23.
    pub hour: u32,
}

impl Default for AnchorRule {
    fn default() -> Self {
        Self {
            weekday: Weekday::Thu,
            hour: 4,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnchorCounter {
    calendar: LocalCalendar,
    rule: AnchorRule,
}

impl AnchorCounter {
    pub fn new(calendar: LocalCalendar, rule: AnchorRule) -> Self {
        Self { calendar, rule }
    }

    /// The event instant on `date`, if `date` is an event day.
    pub fn event_on(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        (date.weekday() == self.rule.weekday)
            .then(|| self.calendar.local_instant(date, self.rule.hour))
    }

    /// Number of events in `[from, to]`, both ends inclusive.
    ///
    /// An inverted interval (`to < from`) counts nothing.
    pub fn count_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
        if to < from {
            return 0;
        }
        let count = self.through(to) - self.before(from);
        trace!(%from, %to, count, "counted weekly anchors");
        u64::try_from(count).unwrap_or(0)
    }

    /// Signed event count from `reference` to `instant`.
    ///
    /// For `instant >= reference` this equals `count_between(reference,
    /// instant)`. For earlier instants it is minus the number of events in
    /// `(instant, reference)`, so the value is non-decreasing in `instant`.
    pub fn net_since(&self, reference: DateTime<Utc>, instant: DateTime<Utc>) -> i64 {
        self.through(instant) - self.before(reference)
    }

    /// Day-by-day reference count over `[from, to]`.
    ///
    /// O(days in the interval). Kept to cross-check [`Self::count_between`].
    pub fn count_between_scan(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
        if to < from {
            return 0;
        }
        let last = self.calendar.local_date(to);
        self.calendar
            .local_date(from)
            .iter_days()
            .take_while(|date| *date <= last)
            .filter_map(|date| self.event_on(date))
            .filter(|event| from <= *event && *event <= to)
            .count() as u64
    }

    /// Events at or before `instant`, relative to an arbitrary fixed origin.
    fn through(&self, instant: DateTime<Utc>) -> i64 {
        let date = self.calendar.local_date(instant);
        let pending = matches!(self.event_on(date), Some(event) if event > instant);
        self.event_days_through(date) - i64::from(pending)
    }

    /// Events strictly before `instant`, same origin as [`Self::through`].
    fn before(&self, instant: DateTime<Utc>) -> i64 {
        let date = self.calendar.local_date(instant);
        let pending = matches!(self.event_on(date), Some(event) if event >= instant);
        self.event_days_through(date) - i64::from(pending)
    }

    /// Event weekdays up to and including `date`, offset by a constant.
    ///
    /// Day 1 of the common era is a Monday, so a date with day number `n`
    /// falls on the rule's weekday when `n ≡ weekday_from_monday + 1 (mod 7)`.
    fn event_days_through(&self, date: NaiveDate) -> i64 {
        let residue = i64::from(self.rule.weekday.num_days_from_monday()) + 1;
        (i64::from(date.num_days_from_ce()) - residue).div_euclid(7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn counter() -> AnchorCounter {
        AnchorCounter::new(LocalCalendar::default(), AnchorRule::default())
    }

    #[test]
    fn empty_interval_before_event_counts_nothing() {
        let reference = utc(2025, 4, 10, 4, 0);
        assert_eq!(counter().count_between(reference, reference), 0);
    }

    #[test]
    fn event_at_upper_bound_is_counted() {
        let c = counter();
        let reference = utc(2025, 4, 10, 4, 0);
        assert_eq!(c.count_between(reference, utc(2025, 4, 10, 7, 59)), 0);
        assert_eq!(c.count_between(reference, utc(2025, 4, 10, 8, 0)), 1);
    }

    #[test]
    fn event_at_lower_bound_is_counted() {
        let c = counter();
        let event = utc(2025, 4, 10, 8, 0);
        assert_eq!(c.count_between(event, event), 1);
    }

    #[test]
    fn event_earlier_on_start_day_is_excluded() {
        let c = counter();
        // Thursday 10:00 EDT, six hours after that day's event.
        let start = utc(2025, 4, 10, 14, 0);
        assert_eq!(c.count_between(start, start), 0);
        assert_eq!(c.count_between(start, utc(2025, 4, 17, 7, 59)), 0);
        assert_eq!(c.count_between(start, utc(2025, 4, 17, 8, 0)), 1);
    }

    #[test]
    fn counts_one_per_week() {
        let c = counter();
        let reference = utc(2025, 4, 10, 4, 0);
        assert_eq!(c.count_between(reference, reference + Duration::days(7)), 1);
        assert_eq!(c.count_between(reference, reference + Duration::weeks(52)), 52);
    }

    #[test]
    fn event_hour_tracks_daylight_saving() {
        let c = counter();
        let from = utc(2025, 10, 30, 12, 0);
        // After fall-back, Thursday 04:00 EST is 09:00Z, not 08:00Z.
        assert_eq!(c.count_between(from, utc(2025, 11, 6, 8, 30)), 0);
        assert_eq!(c.count_between(from, utc(2025, 11, 6, 9, 0)), 1);
        assert_eq!(c.event_on(NaiveDate::from_ymd_opt(2025, 11, 6).unwrap()), Some(utc(2025, 11, 6, 9, 0)));
    }

    #[test]
    fn inverted_interval_counts_nothing() {
        let c = counter();
        assert_eq!(c.count_between(utc(2025, 4, 20, 0, 0), utc(2025, 4, 1, 0, 0)), 0);
    }

    #[test]
    fn net_since_is_negative_before_reference() {
        let c = counter();
        let reference = utc(2025, 4, 10, 4, 0);
        assert_eq!(c.net_since(reference, reference - Duration::hours(1)), 0);
        // The previous Thursday's event itself is outside (instant, reference).
        assert_eq!(c.net_since(reference, utc(2025, 4, 3, 8, 0)), 0);
        assert_eq!(c.net_since(reference, utc(2025, 4, 3, 7, 0)), -1);
        assert_eq!(c.net_since(reference, utc(2025, 4, 10, 8, 0)), 1);
    }

    #[test]
    fn scan_agrees_with_closed_form_over_a_year() {
        let c = counter();
        let reference = utc(2025, 4, 10, 4, 0);
        for hours in (0..24 * 400).step_by(7) {
            let to = reference + Duration::hours(hours);
            assert_eq!(
                c.count_between(reference, to),
                c.count_between_scan(reference, to),
                "mismatch at {to}"
            );
        }
    }

    #[test]
    fn other_weekday_rule() {
        let c = AnchorCounter::new(
            LocalCalendar::default(),
            AnchorRule { weekday: Weekday::Mon, hour: 0 },
        );
        // Monday 2025-04-14 00:00 EDT = 04:00Z.
        let from = utc(2025, 4, 10, 4, 0);
        assert_eq!(c.count_between(from, utc(2025, 4, 14, 3, 59)), 0);
        assert_eq!(c.count_between(from, utc(2025, 4, 14, 4, 0)), 1);
    }
}
