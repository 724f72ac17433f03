//! Rotation engine.
//!
//! The active slot is derived from a single reference anchor: "at this
//! instant, slot `index` was active". From there three corrections apply:
//!
//! ```text
//! base  = (index - days_elapsed - weekly_anchors) mod N
//! slot  = (base + hour_of_day) mod N
//! ```
//!
//! The rotation moves one slot forward per elapsed hour, every full day
//! restarts one step further back, and every weekly re-anchor event moves the
//! start one more step back. All three terms are summed before the modulus.
//!
//! The engine never reads the wall clock; `now` is always a parameter.

use chrono::{DateTime, Duration, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::anchors::{AnchorCounter, AnchorRule};
use super::slot::{RotationSlot, SlotTable};
use crate::calendar::LocalCalendar;
use crate::error::{ConfigError, CoreError, Result};
use crate::storage::Config;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;
const HOURS_PER_DAY: i64 = 24;
/// Predictions stay within 100 000 years of the reference, inside the range
/// where both chrono and the zone rules can represent local time.
const MAX_HOURS_ELAPSED: i64 = 100_000 * 366 * HOURS_PER_DAY;

/// Ground truth for the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceAnchor {
    pub instant: DateTime<Utc>,
    pub index: usize,
}

/// The slot active during one hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPrediction {
    /// Start of the hour this prediction covers.
    pub instant: DateTime<Utc>,
    pub slot_index: usize,
    pub slot: RotationSlot,
    /// Inside the nightly maintenance hour; no spawn happens.
    pub suppressed: bool,
}

impl SpawnPrediction {
    /// Whether `now` falls inside the hour this prediction covers.
    pub fn is_current_hour(&self, now: DateTime<Utc>) -> bool {
        now >= self.instant && now < self.instant + Duration::hours(1)
    }
}

#[derive(Debug, Clone)]
pub struct RotationEngine {
    anchor: ReferenceAnchor,
    slots: SlotTable,
    calendar: LocalCalendar,
    anchors: AnchorCounter,
    suppressed_hour: u32,
}

impl RotationEngine {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the reference index is
    /// outside the slot table or an hour is outside `0..=23`.
    pub fn new(
        anchor: ReferenceAnchor,
        slots: SlotTable,
        calendar: LocalCalendar,
        rule: AnchorRule,
        suppressed_hour: u32,
    ) -> Result<Self, ConfigError> {
        if anchor.index >= slots.len() {
            return Err(ConfigError::invalid(
                "rotation.reference_index",
                format!("{} is out of range for {} slots", anchor.index, slots.len()),
            ));
        }
        if rule.hour > 23 {
            return Err(ConfigError::invalid("anchor.hour", "must be in 0..=23"));
        }
        if suppressed_hour > 23 {
            return Err(ConfigError::invalid("suppression.hour", "must be in 0..=23"));
        }
        debug!(
            reference = %anchor.instant,
            index = anchor.index,
            slots = slots.len(),
            tz = %calendar.timezone(),
            "rotation engine ready"
        );
        Ok(Self {
            anchor,
            slots,
            calendar,
            anchors: AnchorCounter::new(calendar, rule),
            suppressed_hour,
        })
    }

    /// Build an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Propagates any configuration problem, including an unknown timezone.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(
            ReferenceAnchor {
                instant: config.rotation.reference_instant,
                index: config.rotation.reference_index,
            },
            SlotTable::new(config.rotation.slots.clone())?,
            LocalCalendar::from_name(&config.rotation.timezone)?,
            config.anchor,
            config.suppression.hour,
        )
    }

    pub fn anchor(&self) -> ReferenceAnchor {
        self.anchor
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn calendar(&self) -> &LocalCalendar {
        &self.calendar
    }

    pub fn anchor_counter(&self) -> &AnchorCounter {
        &self.anchors
    }

    /// Whole hours from the reference instant to `now`, rounded down.
    pub fn hours_elapsed(&self, now: DateTime<Utc>) -> i64 {
        (now - self.anchor.instant)
            .num_milliseconds()
            .div_euclid(MS_PER_HOUR)
    }

    /// Prediction for the hour `hour_offset` hours after the one containing `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OffsetOutOfRange`] when the target hour lies more
    /// than 100 000 years from the reference instant.
    pub fn compute_slot(&self, now: DateTime<Utc>, hour_offset: i64) -> Result<SpawnPrediction> {
        self.hours_elapsed(now)
            .checked_add(hour_offset)
            .and_then(|hours| self.slot_at_hours(hours))
            .ok_or(CoreError::OffsetOutOfRange { hour_offset })
    }

    /// Prediction for the hour starting `hours_elapsed` hours after the reference.
    ///
    /// `None` when that hour is outside the supported range.
    pub fn slot_at_hours(&self, hours_elapsed: i64) -> Option<SpawnPrediction> {
        if hours_elapsed.unsigned_abs() > MAX_HOURS_ELAPSED.unsigned_abs() {
            return None;
        }
        let instant = TimeDelta::try_hours(hours_elapsed)
            .and_then(|delta| self.anchor.instant.checked_add_signed(delta))?;
        let days_elapsed = hours_elapsed.div_euclid(HOURS_PER_DAY);
        let hour_of_day = hours_elapsed.rem_euclid(HOURS_PER_DAY);
        let extra_anchors = self.anchors.net_since(self.anchor.instant, instant);

        let n = self.slots.len() as i64;
        let base = (self.anchor.index as i64 - days_elapsed - extra_anchors).rem_euclid(n);
        let slot_index = (base + hour_of_day).rem_euclid(n) as usize;

        Some(SpawnPrediction {
            instant,
            slot_index,
            slot: self.slots.get(slot_index).clone(),
            suppressed: self.is_suppressed(instant),
        })
    }

    /// Whether `instant` falls in the local maintenance hour.
    pub fn is_suppressed(&self, instant: DateTime<Utc>) -> bool {
        self.calendar.classify(instant).hour == self.suppressed_hour
    }
}

impl Default for RotationEngine {
    fn default() -> Self {
        let calendar = LocalCalendar::default();
        let rule = AnchorRule::default();
        Self {
            anchor: ReferenceAnchor {
                instant: crate::storage::default_reference_instant(),
                index: 1,
            },
            slots: SlotTable::default(),
            calendar,
            anchors: AnchorCounter::new(calendar, rule),
            suppressed_hour: 22,
        }
    }
}
