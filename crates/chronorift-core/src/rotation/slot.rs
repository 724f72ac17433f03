use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One entry of the rotation: where the chest and the ore spawn together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSlot {
    /// Chest location.
    pub primary: String,
    /// Ore location.
    pub secondary: String,
}

impl RotationSlot {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

impl std::fmt::Display for RotationSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chest: {}, ore: {}", self.primary, self.secondary)
    }
}

/// The stock four-location rotation.
pub fn default_slots() -> Vec<RotationSlot> {
    vec![
        RotationSlot::new("Orc Village", "Sealed Sanctuary"),
        RotationSlot::new("Sealed Sanctuary", "Shrine of Devotion"),
        RotationSlot::new("Shrine of Devotion", "Arkeum Post"),
        RotationSlot::new("Arkeum Post", "Orc Village"),
    ]
}

/// Non-empty cyclic sequence of slots, indexed modulo its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotTable {
    slots: Vec<RotationSlot>,
}

impl SlotTable {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty sequence.
    pub fn new(slots: Vec<RotationSlot>) -> Result<Self, ConfigError> {
        if slots.is_empty() {
            return Err(ConfigError::invalid(
                "rotation.slots",
                "at least one slot is required",
            ));
        }
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at `index`, wrapping around the end of the table.
    pub fn get(&self, index: usize) -> &RotationSlot {
        &self.slots[index % self.slots.len()]
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self {
            slots: default_slots(),
        }
    }
}
