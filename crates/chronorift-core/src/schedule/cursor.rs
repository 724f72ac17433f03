use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rotation::{RotationEngine, SpawnPrediction};

/// Pages through the forward schedule one batch at a time.
///
/// Each call to [`ScheduleCursor::advance`] continues where the previous one
/// stopped, so successive batches never overlap and stay in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCursor {
    next_offset: u64,
}

impl ScheduleCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hour offset the next batch starts at.
    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    /// The next `count` hourly predictions.
    ///
    /// On error the cursor stays where it was.
    pub fn advance(
        &mut self,
        engine: &RotationEngine,
        now: DateTime<Utc>,
        count: usize,
    ) -> Result<Vec<SpawnPrediction>> {
        let start = self.next_offset;
        let end = start.saturating_add(count as u64);
        let batch = (start..end)
            .map(|offset| engine.compute_slot(now, i64::try_from(offset).unwrap_or(i64::MAX)))
            .collect::<Result<Vec<_>>>()?;
        self.next_offset = end;
        Ok(batch)
    }

    pub fn reset(&mut self) {
        self.next_offset = 0;
    }
}
