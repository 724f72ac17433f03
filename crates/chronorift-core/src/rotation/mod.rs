mod anchors;
mod engine;
mod slot;

pub use anchors::{AnchorCounter, AnchorRule};
pub use engine::{ReferenceAnchor, RotationEngine, SpawnPrediction};
pub use slot::{default_slots, RotationSlot, SlotTable};
