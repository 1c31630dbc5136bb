//! # Device Catalog
//!
//! The fixed set of field-device categories the estimator knows about.
//! Catalog order is display order: BOM rows and per-floor inputs follow it.
//!
//! Devices with `points = 1` occupy one address on an SLC loop; horns and
//! speakers (`points = 0`) load notification circuits instead.
//!
//! ```rust
//! use fdas_core::catalog::{DeviceKey, DEVICE_CATALOG};
//!
//! let key: DeviceKey = "hornstrobe".parse().unwrap();
//! assert_eq!(key, DeviceKey::HornStrobe);
//! assert_eq!(key.entry().points, 0);
//! assert_eq!(DEVICE_CATALOG[0].label, "Smoke Detector");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::FdasError;
use crate::numeric::{clamp_count, number_from_json};

/// Identifier of a device category.
///
/// Variant order matches catalog order, so ordered maps keyed by
/// `DeviceKey` iterate in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceKey {
    Smoke,
    Heat,
    Mps,
    Aim,
    Ann,
    Wfs,
    Ts,
    Fjt,
    Md,
    HornStrobe,
    SpeakerStrobe,
}

impl DeviceKey {
    /// Every device key, in catalog order
    pub const ALL: [DeviceKey; 11] = [
        DeviceKey::Smoke,
        DeviceKey::Heat,
        DeviceKey::Mps,
        DeviceKey::Aim,
        DeviceKey::Ann,
        DeviceKey::Wfs,
        DeviceKey::Ts,
        DeviceKey::Fjt,
        DeviceKey::Md,
        DeviceKey::HornStrobe,
        DeviceKey::SpeakerStrobe,
    ];

    /// Key as it appears in documents and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKey::Smoke => "smoke",
            DeviceKey::Heat => "heat",
            DeviceKey::Mps => "mps",
            DeviceKey::Aim => "aim",
            DeviceKey::Ann => "ann",
            DeviceKey::Wfs => "wfs",
            DeviceKey::Ts => "ts",
            DeviceKey::Fjt => "fjt",
            DeviceKey::Md => "md",
            DeviceKey::HornStrobe => "hornStrobe",
            DeviceKey::SpeakerStrobe => "speakerStrobe",
        }
    }

    /// Catalog entry for this key
    pub fn entry(&self) -> &'static DeviceCatalogEntry {
        // ALL and DEVICE_CATALOG share an order
        &DEVICE_CATALOG[*self as usize]
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKey {
    type Err = FdasError;

    /// Case-insensitive; `horn-strobe`, `horn_strobe` and `hornStrobe` all match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_key(s);
        DeviceKey::ALL
            .iter()
            .copied()
            .find(|k| normalize_key(k.as_str()) == wanted)
            .ok_or_else(|| FdasError::unknown_device(s.trim()))
    }
}

fn normalize_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// One row of the static device catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceCatalogEntry {
    pub key: DeviceKey,
    /// Display text used in the BOM
    pub label: &'static str,
    /// SLC point cost (0 or 1)
    pub points: u8,
}

/// The device catalog, in display order.
pub static DEVICE_CATALOG: [DeviceCatalogEntry; 11] = [
    DeviceCatalogEntry {
        key: DeviceKey::Smoke,
        label: "Smoke Detector",
        points: 1,
    },
    DeviceCatalogEntry {
        key: DeviceKey::Heat,
        label: "Heat Detector",
        points: 1,
    },
    DeviceCatalogEntry {
        key: DeviceKey::Mps,
        label: "Manual Pull Station",
        points: 1,
    },
    DeviceCatalogEntry {
        key: DeviceKey::Aim,
        label: "Addressable Interface Module (AIM)",
        points: 1,
    },
    DeviceCatalogEntry {
        key: DeviceKey::Ann,
        label: "Annunciator (device)",
        points: 1,
    },
    DeviceCatalogEntry {
        key: DeviceKey::Wfs,
        label: "Water Flow Switch (WFS)",
        points: 1,
    },
    DeviceCatalogEntry {
        key: DeviceKey::Ts,
        label: "Tamper Switch (TS)",
        points: 1,
    },
    DeviceCatalogEntry {
        key: DeviceKey::Fjt,
        label: "Fireman’s Telephone Jack",
        points: 1,
    },
    DeviceCatalogEntry {
        key: DeviceKey::Md,
        label: "Motorized Damper",
        points: 1,
    },
    DeviceCatalogEntry {
        key: DeviceKey::HornStrobe,
        label: "Horn/Strobe",
        points: 0,
    },
    DeviceCatalogEntry {
        key: DeviceKey::SpeakerStrobe,
        label: "Speaker/Strobe",
        points: 0,
    },
];

/// Catalog entries whose label contains `query`, case-insensitively.
/// An empty query matches everything.
pub fn filter_catalog(query: &str) -> impl Iterator<Item = &'static DeviceCatalogEntry> {
    let needle = query.to_lowercase();
    DEVICE_CATALOG
        .iter()
        .filter(move |d| d.label.to_lowercase().contains(&needle))
}

/// Per-device quantities keyed by [`DeviceKey`].
///
/// Serializes as a flat JSON object (`{"smoke": 12, "heat": 3, ...}`).
/// Deserialization is lenient: negative, fractional, string or null
/// values are clamped into `[0, 99999]` instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeviceCounts(BTreeMap<DeviceKey, u64>);

impl DeviceCounts {
    /// Counts with every catalog key present and set to zero
    pub fn zeroed() -> Self {
        DeviceCounts(DeviceKey::ALL.iter().map(|k| (*k, 0)).collect())
    }

    /// Count for `key`; absent keys read as zero
    pub fn get(&self, key: DeviceKey) -> u64 {
        self.0.get(&key).copied().unwrap_or(0)
    }

    pub fn set(&mut self, key: DeviceKey, value: u64) {
        self.0.insert(key, value);
    }

    pub fn add(&mut self, key: DeviceKey, value: u64) {
        *self.0.entry(key).or_insert(0) += value;
    }

    /// Iterate `(key, count)` in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (DeviceKey, u64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Sum of every count
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl FromIterator<(DeviceKey, u64)> for DeviceCounts {
    fn from_iter<I: IntoIterator<Item = (DeviceKey, u64)>>(iter: I) -> Self {
        DeviceCounts(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for DeviceCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<DeviceKey, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(k, v)| (k, clamp_count(number_from_json(&v))))
            .collect())
    }
}
