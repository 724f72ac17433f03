//! Next spawn boundary.
//!
//! Spawns happen every `step_minutes` past the top of the hour, except during
//! the suppressed local hour. The boundary search is independent of the hourly
//! slot rotation: several boundaries within one hour share the same slot.

use chrono::{DateTime, Duration, Timelike, Utc};
use tracing::trace;

use crate::error::ConfigError;
use crate::rotation::RotationEngine;

/// Spacing between spawn boundaries, a positive divisor of 60 minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryStep {
    minutes: u32,
}

impl BoundaryStep {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `minutes` is zero or does not
    /// divide 60.
    pub fn new(minutes: u32) -> Result<Self, ConfigError> {
        if minutes == 0 || 60 % minutes != 0 {
            return Err(ConfigError::invalid(
                "boundary.step_minutes",
                format!("{minutes} must be a positive divisor of 60"),
            ));
        }
        Ok(Self { minutes })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes))
    }
}

impl Default for BoundaryStep {
    fn default() -> Self {
        Self { minutes: 20 }
    }
}

/// First step boundary strictly after `now` outside the suppressed hour.
///
/// Terminates because the suppressed window is a single local hour, so at
/// most `60 / step` advances are needed to leave it.
pub fn next_boundary(
    engine: &RotationEngine,
    now: DateTime<Utc>,
    step: BoundaryStep,
) -> DateTime<Utc> {
    let truncated = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let increment = step.minutes - truncated.minute() % step.minutes;
    let mut next = truncated + Duration::minutes(i64::from(increment));

    while engine.is_suppressed(next) {
        next += step.duration();
        trace!(%next, "boundary in suppressed hour, advancing");
    }
    next
}
