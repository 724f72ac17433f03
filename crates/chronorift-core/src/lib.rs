//! # Chronorift Core Library
//!
//! This library predicts which chest/ore location pair is active at any
//! instant, whether spawning is suppressed by the nightly maintenance hour,
//! and when the next spawn happens. The CLI binary is a thin consumer of the
//! same library.
//!
//! ## Architecture
//!
//! - **Calendar**: civil hour and weekday of UTC instants in a DST-observing zone
//! - **Rotation**: the slot table, weekly re-anchor counting and the rotation
//!   engine, all pure functions of an explicit `now`
//! - **Schedule**: spawn boundary search, paginated forward schedule, countdown
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`RotationEngine`]: slot active N hours from `now`
//! - [`Forecaster`]: query facade used by presentation layers
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod error;
pub mod forecast;
pub mod rotation;
pub mod schedule;
pub mod storage;

pub use calendar::{LocalCalendar, LocalHour};
pub use error::{ConfigError, CoreError};
pub use forecast::{Forecaster, SpawnForecast};
pub use rotation::{
    AnchorCounter, AnchorRule, ReferenceAnchor, RotationEngine, RotationSlot, SlotTable,
    SpawnPrediction,
};
pub use schedule::{next_boundary, BoundaryStep, Countdown, CountdownTracker, ScheduleCursor};
pub use storage::Config;
