use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

/// How long the "spawning now" state is held after a spawn starts.
const SPAWN_HOLD_SECS: i64 = 60;

/// Time left until the next spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    SpawningNow,
    Remaining(Duration),
}

impl Countdown {
    /// One second or less remaining counts as spawning.
    pub fn until(now: DateTime<Utc>, target: DateTime<Utc>) -> Self {
        let remaining = target - now;
        if remaining <= Duration::seconds(1) {
            Countdown::SpawningNow
        } else {
            Countdown::Remaining(remaining)
        }
    }
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Countdown::SpawningNow => write!(f, "Spawning now"),
            Countdown::Remaining(remaining) => {
                let secs = remaining.num_seconds();
                let hours = (secs / 3600) % 24;
                let minutes = (secs / 60) % 60;
                let seconds = secs % 60;
                if hours > 0 {
                    write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
                } else {
                    write!(f, "{minutes:02}:{seconds:02}")
                }
            }
        }
    }
}

impl Serialize for Countdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Countdown display state for a periodic refresh loop.
///
/// Once a spawn starts, "spawning now" is held for a minute before counting
/// down to the following boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountdownTracker {
    spawning_since: Option<DateTime<Utc>>,
}

impl CountdownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, now: DateTime<Utc>, next_boundary: DateTime<Utc>) -> Countdown {
        if let Some(since) = self.spawning_since {
            if now - since < Duration::seconds(SPAWN_HOLD_SECS) {
                return Countdown::SpawningNow;
            }
            self.spawning_since = None;
        }

        let countdown = Countdown::until(now, next_boundary);
        if countdown == Countdown::SpawningNow {
            self.spawning_since = Some(now);
        }
        countdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, h, m, s).unwrap()
    }

    #[test]
    fn formats_minutes_and_seconds() {
        let c = Countdown::until(at(12, 5, 30), at(12, 20, 0));
        assert_eq!(c.to_string(), "14:30");
    }

    #[test]
    fn formats_hours_when_present() {
        let c = Countdown::until(at(1, 45, 0), at(3, 0, 0));
        assert_eq!(c.to_string(), "01:15:00");
    }

    #[test]
    fn last_second_counts_as_spawning() {
        assert_eq!(Countdown::until(at(12, 19, 59), at(12, 20, 0)), Countdown::SpawningNow);
        assert_eq!(Countdown::until(at(12, 19, 58), at(12, 20, 0)).to_string(), "00:02");
    }

    #[test]
    fn serializes_as_display_string() {
        let json = serde_json::to_string(&Countdown::SpawningNow).unwrap();
        assert_eq!(json, "\"Spawning now\"");
    }

    #[test]
    fn tracker_holds_spawning_for_a_minute() {
        let mut tracker = CountdownTracker::new();
        assert_eq!(tracker.update(at(12, 19, 59), at(12, 20, 0)), Countdown::SpawningNow);
        // The boundary has moved on, but the hold is still active.
        assert_eq!(tracker.update(at(12, 20, 30), at(12, 40, 0)), Countdown::SpawningNow);
        assert_eq!(tracker.update(at(12, 20, 58), at(12, 40, 0)), Countdown::SpawningNow);
        assert_eq!(tracker.update(at(12, 21, 0), at(12, 40, 0)).to_string(), "19:00");
    }
}
