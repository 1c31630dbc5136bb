//! # Rule Set
//!
//! The configurable engineering parameters behind every derived number:
//! spare percentages, loop and circuit capacities, per-device current draw
//! and the device → module mapping.
//!
//! A `RuleSet` is a plain value. Editing one produces a new snapshot that the
//! owner swaps in; nothing derived is cached, so the next derivation picks
//! the edit up.
//!
//! ## Defaults
//!
//! | Rule | Default | Clamp range |
//! |------|---------|-------------|
//! | `sparePercent` | 0.10 | 0 – 1 |
//! | `loopMaxPoints` | 250 | 50 – 1000 |
//! | `loopSparePercent` | 0.20 | 0 – 0.8 |
//! | `nacMaxAmps` | 2.0 A | 0.5 – 10 |
//! | `hornStrobeAmpsEach` | 0.10 A | 0.01 – 2 |
//! | `speakerStrobeAmpsEach` | 0.11 A | 0.01 – 2 |
//! | `nacSparePercent` | 0.20 | 0 – 0.8 |
//! | `cc1PerNAC` | 1 | 0 – 10 |
//!
//! ## Example
//!
//! ```rust
//! use fdas_core::rules::{RuleField, RuleSet};
//!
//! let rules = RuleSet::default();
//! let edited = rules.with_value(RuleField::LoopSparePercent, "0.95");
//! assert_eq!(edited.loop_spare_percent, 0.8); // clamped
//! assert_eq!(rules.loop_spare_percent, 0.2); // original snapshot untouched
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::catalog::{DeviceKey, DEVICE_CATALOG};
use crate::errors::FdasError;
use crate::numeric::{clamp_number, number_from_json, parse_number};

/// Interface/control module families that can appear in an estimate.
///
/// Variant order is the fixed order of module rows in the BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModuleCode {
    /// Monitor / input module
    #[serde(rename = "CT1")]
    Ct1,
    /// Control relay module
    #[serde(rename = "CR")]
    Cr,
    /// NAC / control module
    #[serde(rename = "CC1")]
    Cc1,
    /// Serial interface / zone module
    #[serde(rename = "SIM")]
    Sim,
}

impl ModuleCode {
    /// Every known module code, in BOM order
    pub const ALL: [ModuleCode; 4] = [
        ModuleCode::Ct1,
        ModuleCode::Cr,
        ModuleCode::Cc1,
        ModuleCode::Sim,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleCode::Ct1 => "CT1",
            ModuleCode::Cr => "CR",
            ModuleCode::Cc1 => "CC1",
            ModuleCode::Sim => "SIM",
        }
    }

    /// Look up a module code by name. Unrecognized codes return `None`.
    pub fn from_code(code: &str) -> Option<ModuleCode> {
        let code = code.trim();
        ModuleCode::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(code))
    }

    /// Label used when the rule set's module map has no entry for this code
    pub fn default_label(&self) -> &'static str {
        match self {
            ModuleCode::Ct1 => "GSA-CT1 (Monitor/Input Module)",
            ModuleCode::Cr => "GSA-CR (Control Relay Module)",
            ModuleCode::Cc1 => "GSA-CC1 (NAC / Control Module)",
            ModuleCode::Sim => "SIM-INTL (Serial Interface / Zone Module)",
        }
    }
}

impl fmt::Display for ModuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display information for a module code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub label: String,
}

/// "One `module` for every `per` devices of this kind"
///
/// `module` is kept as free text: codes the estimator does not recognize are
/// skipped, not rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleMapping {
    pub module: String,
    #[serde(default = "default_per", deserialize_with = "lenient_per")]
    pub per: u32,
}

fn default_per() -> u32 {
    1
}

/// `per` from a document: rounded, at least 1; junk reads as 1.
fn lenient_per<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = number_from_json(&Value::deserialize(deserializer)?);
    Ok(clamp_number(raw.round(), 1.0, f64::from(u32::MAX)) as u32)
}

impl ModuleMapping {
    pub fn new(module: ModuleCode, per: u32) -> Self {
        ModuleMapping {
            module: module.as_str().to_string(),
            per,
        }
    }
}

/// The configurable estimation rules.
///
/// Field names serialize in camelCase to match exported documents
/// (`sparePercent`, `loopMaxPoints`, ..., `cc1PerNAC`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    /// BOM spare applied to every device total (0.10 = 10%)
    #[serde(deserialize_with = "lenient::spare_percent")]
    pub spare_percent: f64,

    /// Addressable points one SLC loop supports
    #[serde(deserialize_with = "lenient::loop_max_points")]
    pub loop_max_points: u32,

    /// Loop capacity held back as headroom
    #[serde(deserialize_with = "lenient::loop_spare_percent")]
    pub loop_spare_percent: f64,

    /// Rated current of one notification circuit (A)
    #[serde(deserialize_with = "lenient::nac_max_amps")]
    pub nac_max_amps: f64,

    /// Current draw of one horn/strobe (A)
    #[serde(deserialize_with = "lenient::horn_strobe_amps_each")]
    pub horn_strobe_amps_each: f64,

    /// Current draw of one speaker/strobe (A)
    #[serde(deserialize_with = "lenient::speaker_strobe_amps_each")]
    pub speaker_strobe_amps_each: f64,

    /// Circuit current held back as headroom
    #[serde(deserialize_with = "lenient::nac_spare_percent")]
    pub nac_spare_percent: f64,

    /// Display labels per module code
    pub module_map: BTreeMap<ModuleCode, ModuleInfo>,

    /// Devices that consume SLC points
    pub slc_point_keys: BTreeSet<DeviceKey>,

    /// Device → module demand mapping
    pub default_module_per_device_key: BTreeMap<DeviceKey, ModuleMapping>,

    /// NAC control modules required per notification circuit
    #[serde(rename = "cc1PerNAC", deserialize_with = "lenient::cc1_per_nac")]
    pub cc1_per_nac: u32,
}

/// Lenient readers for numeric rules in documents.
///
/// Numbers, numeric strings and junk are all accepted and clamped into the
/// rule's range, so a hand-edited document never fails to load over a rule
/// value. Non-numeric values land on the range minimum.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    use super::RuleField;
    use crate::numeric::{clamp_number, number_from_json};

    fn read<'de, D>(deserializer: D, field: RuleField) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = number_from_json(&Value::deserialize(deserializer)?);
        let (min, max) = field.range();
        let clamped = clamp_number(raw, min, max);
        if clamped != raw {
            warn!(
                rule = field.name(),
                requested = raw,
                applied = clamped,
                "loaded rule value clamped"
            );
        }
        Ok(clamped)
    }

    fn read_whole<'de, D>(deserializer: D, field: RuleField) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(read(deserializer, field)?.round() as u32)
    }

    pub fn spare_percent<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        read(d, RuleField::SparePercent)
    }

    pub fn loop_max_points<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        read_whole(d, RuleField::LoopMaxPoints)
    }

    pub fn loop_spare_percent<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        read(d, RuleField::LoopSparePercent)
    }

    pub fn nac_max_amps<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        read(d, RuleField::NacMaxAmps)
    }

    pub fn horn_strobe_amps_each<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        read(d, RuleField::HornStrobeAmpsEach)
    }

    pub fn speaker_strobe_amps_each<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        read(d, RuleField::SpeakerStrobeAmpsEach)
    }

    pub fn nac_spare_percent<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        read(d, RuleField::NacSparePercent)
    }

    pub fn cc1_per_nac<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        read_whole(d, RuleField::Cc1PerNac)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            spare_percent: 0.1,
            loop_max_points: 250,
            loop_spare_percent: 0.2,
            nac_max_amps: 2.0,
            horn_strobe_amps_each: 0.10,
            speaker_strobe_amps_each: 0.11,
            nac_spare_percent: 0.2,
            module_map: ModuleCode::ALL
                .iter()
                .map(|m| {
                    (
                        *m,
                        ModuleInfo {
                            label: m.default_label().to_string(),
                        },
                    )
                })
                .collect(),
            slc_point_keys: DEVICE_CATALOG
                .iter()
                .filter(|d| d.points > 0)
                .map(|d| d.key)
                .collect(),
            default_module_per_device_key: [
                (DeviceKey::Wfs, ModuleMapping::new(ModuleCode::Ct1, 1)),
                (DeviceKey::Ts, ModuleMapping::new(ModuleCode::Ct1, 1)),
                (DeviceKey::Md, ModuleMapping::new(ModuleCode::Cr, 1)),
            ]
            .into_iter()
            .collect(),
            cc1_per_nac: 1,
        }
    }
}

impl RuleSet {
    /// Label for a module code, falling back to the built-in label
    pub fn module_label(&self, code: ModuleCode) -> &str {
        self.module_map
            .get(&code)
            .map(|info| info.label.as_str())
            .unwrap_or_else(|| code.default_label())
    }

    /// Current value of a numeric rule
    pub fn get(&self, field: RuleField) -> f64 {
        match field {
            RuleField::SparePercent => self.spare_percent,
            RuleField::LoopMaxPoints => f64::from(self.loop_max_points),
            RuleField::LoopSparePercent => self.loop_spare_percent,
            RuleField::NacMaxAmps => self.nac_max_amps,
            RuleField::HornStrobeAmpsEach => self.horn_strobe_amps_each,
            RuleField::SpeakerStrobeAmpsEach => self.speaker_strobe_amps_each,
            RuleField::NacSparePercent => self.nac_spare_percent,
            RuleField::Cc1PerNac => f64::from(self.cc1_per_nac),
        }
    }

    /// Set a numeric rule, clamping into its range. Integer rules round to
    /// the nearest whole number.
    pub fn set(&mut self, field: RuleField, value: f64) {
        let (min, max) = field.range();
        let clamped = clamp_number(value, min, max);
        if clamped != value {
            warn!(rule = field.name(), requested = value, applied = clamped, "rule value clamped");
        }
        match field {
            RuleField::SparePercent => self.spare_percent = clamped,
            RuleField::LoopMaxPoints => self.loop_max_points = clamped.round() as u32,
            RuleField::LoopSparePercent => self.loop_spare_percent = clamped,
            RuleField::NacMaxAmps => self.nac_max_amps = clamped,
            RuleField::HornStrobeAmpsEach => self.horn_strobe_amps_each = clamped,
            RuleField::SpeakerStrobeAmpsEach => self.speaker_strobe_amps_each = clamped,
            RuleField::NacSparePercent => self.nac_spare_percent = clamped,
            RuleField::Cc1PerNac => self.cc1_per_nac = clamped.round() as u32,
        }
    }

    /// New snapshot with one rule replaced by user text.
    ///
    /// Non-numeric text clamps to the rule's minimum.
    pub fn with_value(&self, field: RuleField, text: &str) -> RuleSet {
        let mut next = self.clone();
        next.set(field, parse_number(text));
        next
    }

    /// Re-clamp every numeric rule and repair the module mapping.
    ///
    /// Applied to rule sets read from documents, where nothing guarantees
    /// the values went through [`RuleSet::set`].
    pub fn sanitized(mut self) -> RuleSet {
        for field in RuleField::ALL {
            let value = self.get(field);
            self.set(field, value);
        }
        for mapping in self.default_module_per_device_key.values_mut() {
            if mapping.per == 0 {
                mapping.per = 1;
            }
        }
        self
    }
}

/// Numeric rules that can be edited by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleField {
    SparePercent,
    LoopMaxPoints,
    LoopSparePercent,
    NacMaxAmps,
    HornStrobeAmpsEach,
    SpeakerStrobeAmpsEach,
    NacSparePercent,
    Cc1PerNac,
}

impl RuleField {
    pub const ALL: [RuleField; 8] = [
        RuleField::SparePercent,
        RuleField::LoopMaxPoints,
        RuleField::LoopSparePercent,
        RuleField::NacMaxAmps,
        RuleField::HornStrobeAmpsEach,
        RuleField::SpeakerStrobeAmpsEach,
        RuleField::NacSparePercent,
        RuleField::Cc1PerNac,
    ];

    /// Document name of the rule
    pub fn name(&self) -> &'static str {
        match self {
            RuleField::SparePercent => "sparePercent",
            RuleField::LoopMaxPoints => "loopMaxPoints",
            RuleField::LoopSparePercent => "loopSparePercent",
            RuleField::NacMaxAmps => "nacMaxAmps",
            RuleField::HornStrobeAmpsEach => "hornStrobeAmpsEach",
            RuleField::SpeakerStrobeAmpsEach => "speakerStrobeAmpsEach",
            RuleField::NacSparePercent => "nacSparePercent",
            RuleField::Cc1PerNac => "cc1PerNAC",
        }
    }

    /// Short description shown next to the value
    pub fn hint(&self) -> &'static str {
        match self {
            RuleField::SparePercent => "BOM spare (0.10 = 10%)",
            RuleField::LoopMaxPoints => "SLC max points per loop (typical 125-250-320)",
            RuleField::LoopSparePercent => "Loop headroom",
            RuleField::NacMaxAmps => "NAC max amps (check module rating)",
            RuleField::HornStrobeAmpsEach => "Horn/Strobe amps each (datasheet)",
            RuleField::SpeakerStrobeAmpsEach => "Speaker/Strobe amps each (datasheet)",
            RuleField::NacSparePercent => "NAC headroom",
            RuleField::Cc1PerNac => "CC1 modules per NAC",
        }
    }

    /// Inclusive valid range
    pub fn range(&self) -> (f64, f64) {
        match self {
            RuleField::SparePercent => (0.0, 1.0),
            RuleField::LoopMaxPoints => (50.0, 1000.0),
            RuleField::LoopSparePercent => (0.0, 0.8),
            RuleField::NacMaxAmps => (0.5, 10.0),
            RuleField::HornStrobeAmpsEach => (0.01, 2.0),
            RuleField::SpeakerStrobeAmpsEach => (0.01, 2.0),
            RuleField::NacSparePercent => (0.0, 0.8),
            RuleField::Cc1PerNac => (0.0, 10.0),
        }
    }
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleField {
    type Err = FdasError;

    /// Accepts document names in any case, with or without `_`/`-`
    /// separators (`loopMaxPoints`, `loop_max_points`, `loop-max-points`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        RuleField::ALL
            .iter()
            .copied()
            .find(|f| f.name().to_lowercase() == wanted)
            .ok_or_else(|| FdasError::unknown_rule(s.trim()))
    }
}
