//! # Floor Registry
//!
//! Ordered per-floor device counts. Order only matters for display.
//!
//! The registry always holds at least one floor: removing the last one is
//! rejected, and deserializing an empty list fails.
//!
//! ```rust
//! use fdas_core::catalog::DeviceKey;
//! use fdas_core::floors::FloorRegistry;
//!
//! let mut floors = FloorRegistry::default();
//! assert_eq!(floors.len(), 3);
//!
//! let idx = floors.add();
//! assert_eq!(floors.get(idx).unwrap().name, "Floor 4");
//!
//! floors.set_count(0, DeviceKey::Smoke, 40.0).unwrap();
//! assert_eq!(floors.get(0).unwrap().counts.get(DeviceKey::Smoke), 40);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{DeviceCounts, DeviceKey};
use crate::errors::{FdasError, FdasResult};
use crate::numeric::clamp_count;

/// One floor's device counts.
///
/// Serializes flat: `{"name": "Ground Floor", "smoke": 12, "heat": 0, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub counts: DeviceCounts,
}

impl Floor {
    /// A floor with every device count at zero
    pub fn empty(name: impl Into<String>) -> Self {
        Floor {
            name: name.into(),
            counts: DeviceCounts::zeroed(),
        }
    }

    /// Builder-style count setter, clamped like user input
    pub fn with_count(mut self, key: DeviceKey, value: f64) -> Self {
        self.counts.set(key, clamp_count(value));
        self
    }
}

/// Name shown for the floor at `index`; blank names fall back to `Floor N`.
pub fn display_name(floor: &Floor, index: usize) -> String {
    if floor.name.trim().is_empty() {
        format!("Floor {}", index + 1)
    } else {
        floor.name.clone()
    }
}

/// Non-empty ordered list of floors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Floor>", into = "Vec<Floor>")]
pub struct FloorRegistry {
    floors: Vec<Floor>,
}

impl Default for FloorRegistry {
    fn default() -> Self {
        FloorRegistry {
            floors: vec![
                Floor::empty("Ground Floor"),
                Floor::empty("2nd Floor"),
                Floor::empty("3rd Floor"),
            ],
        }
    }
}

impl TryFrom<Vec<Floor>> for FloorRegistry {
    type Error = FdasError;

    fn try_from(floors: Vec<Floor>) -> Result<Self, Self::Error> {
        if floors.is_empty() {
            return Err(FdasError::invalid_input("floors", "[]", "At least one floor is required"));
        }
        Ok(FloorRegistry { floors })
    }
}

impl From<FloorRegistry> for Vec<Floor> {
    fn from(registry: FloorRegistry) -> Self {
        registry.floors
    }
}

impl FloorRegistry {
    /// Registry holding a single empty floor
    pub fn single(name: impl Into<String>) -> Self {
        FloorRegistry {
            floors: vec![Floor::empty(name)],
        }
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Floor> {
        self.floors.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Floor> {
        self.floors.iter()
    }

    pub fn as_slice(&self) -> &[Floor] {
        &self.floors
    }

    /// Append an empty floor named `Floor N` and return its index
    pub fn add(&mut self) -> usize {
        let name = format!("Floor {}", self.floors.len() + 1);
        self.floors.push(Floor::empty(name));
        self.floors.len() - 1
    }

    /// Append a prepared floor and return its index
    pub fn push(&mut self, floor: Floor) -> usize {
        self.floors.push(floor);
        self.floors.len() - 1
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> FdasResult<()> {
        self.floor_mut(index)?.name = name.into();
        Ok(())
    }

    /// Set one device count; the value is clamped to `[0, 99999]`
    pub fn set_count(&mut self, index: usize, key: DeviceKey, value: f64) -> FdasResult<()> {
        self.floor_mut(index)?.counts.set(key, clamp_count(value));
        Ok(())
    }

    /// Reset every count on a floor to zero, keeping its name
    pub fn clear(&mut self, index: usize) -> FdasResult<()> {
        let floor = self.floor_mut(index)?;
        let name = display_name(floor, index);
        *floor = Floor::empty(name);
        Ok(())
    }

    /// Remove a floor. Rejected when it is the only one left.
    pub fn remove(&mut self, index: usize) -> FdasResult<Floor> {
        if index >= self.floors.len() {
            return Err(FdasError::floor_not_found(index, self.floors.len()));
        }
        if self.floors.len() == 1 {
            return Err(FdasError::LastFloor);
        }
        Ok(self.floors.remove(index))
    }

    fn floor_mut(&mut self, index: usize) -> FdasResult<&mut Floor> {
        let len = self.floors.len();
        self.floors
            .get_mut(index)
            .ok_or_else(|| FdasError::floor_not_found(index, len))
    }
}

impl<'a> IntoIterator for &'a FloorRegistry {
    type Item = &'a Floor;
    type IntoIter = std::slice::Iter<'a, Floor>;

    fn into_iter(self) -> Self::IntoIter {
        self.floors.iter()
    }
}
