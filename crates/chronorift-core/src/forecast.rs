//! Query surface for presentation layers.
//!
//! [`Forecaster`] bundles a rotation engine, the boundary step and a schedule
//! cursor. All queries take `now` explicitly and are pure apart from the
//! cursor, which sits behind a mutex so a shared forecaster can be paged from
//! several callers.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::rotation::{RotationEngine, SpawnPrediction};
use crate::schedule::{next_boundary, BoundaryStep, Countdown, ScheduleCursor};
use crate::storage::Config;

/// The upcoming spawn as seen from `now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpawnForecast {
    pub now: DateTime<Utc>,
    /// When the next spawn happens.
    pub boundary: DateTime<Utc>,
    pub countdown: Countdown,
    /// Slot active during the hour containing `boundary`.
    pub prediction: SpawnPrediction,
}

#[derive(Debug)]
pub struct Forecaster {
    engine: RotationEngine,
    step: BoundaryStep,
    page_size: usize,
    cursor: Mutex<ScheduleCursor>,
}

impl Forecaster {
    pub fn new(engine: RotationEngine, step: BoundaryStep, page_size: usize) -> Self {
        Self {
            engine,
            step,
            page_size: page_size.max(1),
            cursor: Mutex::new(ScheduleCursor::new()),
        }
    }

    /// # Errors
    ///
    /// Fails on any invalid configuration value, including an unknown zone.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            RotationEngine::from_config(config)?,
            BoundaryStep::new(config.boundary.step_minutes)?,
            config.schedule.page_size,
        ))
    }

    pub fn engine(&self) -> &RotationEngine {
        &self.engine
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn slot_at_offset(
        &self,
        now: DateTime<Utc>,
        hour_offset: i64,
    ) -> Result<SpawnPrediction> {
        self.engine.compute_slot(now, hour_offset)
    }

    pub fn next_boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        next_boundary(&self.engine, now, self.step)
    }

    /// The next `count` predictions after those already handed out.
    pub fn next_n(&self, now: DateTime<Utc>, count: usize) -> Result<Vec<SpawnPrediction>> {
        self.cursor().advance(&self.engine, now, count)
    }

    /// The next page of [`Self::page_size`] predictions.
    pub fn next_page(&self, now: DateTime<Utc>) -> Result<Vec<SpawnPrediction>> {
        self.next_n(now, self.page_size)
    }

    pub fn reset_cursor(&self) {
        self.cursor().reset();
    }

    /// # Errors
    ///
    /// Fails only when `now` is outside the engine's supported range.
    pub fn next_spawn(&self, now: DateTime<Utc>) -> Result<SpawnForecast> {
        let boundary = self.next_boundary(now);
        let hour_offset = self.engine.hours_elapsed(boundary) - self.engine.hours_elapsed(now);
        Ok(SpawnForecast {
            now,
            boundary,
            countdown: Countdown::until(now, boundary),
            prediction: self.engine.compute_slot(now, hour_offset)?,
        })
    }

    fn cursor(&self) -> MutexGuard<'_, ScheduleCursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(RotationEngine::default(), BoundaryStep::default(), 3)
    }
}
