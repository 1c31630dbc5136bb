//! # NAC Allocator
//!
//! Estimates Notification Appliance Circuits from horn/strobe and
//! speaker/strobe current draw.
//!
//! Horns and speakers never share a circuit: each class is sized on its own
//! against the usable circuit current.
//!
//! ```text
//! effNacCap = nacMaxAmps × (1 − nacSparePercent)
//! hornNacs  = ceil(hornCount × hornAmpsEach / effNacCap)     (0 if effNacCap ≤ 0)
//! spkNacs   = ceil(speakerCount × speakerAmpsEach / effNacCap)
//! totalNacs = hornNacs + spkNacs
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fdas_core::calculations::nac::{estimate, NacInput};
//!
//! let plan = estimate(&NacInput {
//!     horn_count: 50,
//!     speaker_count: 0,
//!     horn_amps_each: 0.10,
//!     speaker_amps_each: 0.11,
//!     nac_max_amps: 2.0,
//!     nac_spare_percent: 0.2,
//! });
//! assert!((plan.eff_nac_cap - 1.6).abs() < 1e-9);
//! assert!((plan.horn_total_a - 5.0).abs() < 1e-9);
//! assert_eq!(plan.horn_nacs, 4);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{DeviceCounts, DeviceKey};
use crate::numeric::{ceil_count, snap};
use crate::rules::RuleSet;

/// Inputs to the NAC estimate. Counts are post-spare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NacInput {
    pub horn_count: u64,
    pub speaker_count: u64,
    pub horn_amps_each: f64,
    pub speaker_amps_each: f64,
    pub nac_max_amps: f64,
    pub nac_spare_percent: f64,
}

impl NacInput {
    /// Pull horn/speaker totals and circuit ratings from a snapshot
    pub fn from_rules(rules: &RuleSet, totals_with_spare: &DeviceCounts) -> Self {
        NacInput {
            horn_count: totals_with_spare.get(DeviceKey::HornStrobe),
            speaker_count: totals_with_spare.get(DeviceKey::SpeakerStrobe),
            horn_amps_each: rules.horn_strobe_amps_each,
            speaker_amps_each: rules.speaker_strobe_amps_each,
            nac_max_amps: rules.nac_max_amps,
            nac_spare_percent: rules.nac_spare_percent,
        }
    }
}

/// Notification circuit estimate, with the raw loads kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NacPlan {
    /// Usable amps per circuit after headroom
    pub eff_nac_cap: f64,
    /// Total horn/strobe load (A)
    pub horn_total_a: f64,
    /// Total speaker/strobe load (A)
    pub spk_total_a: f64,
    pub horn_nacs: u64,
    pub spk_nacs: u64,
    pub total_nacs: u64,
}

fn circuits_for(load_a: f64, eff_cap: f64) -> u64 {
    if eff_cap > 0.0 {
        ceil_count(load_a / eff_cap)
    } else {
        0
    }
}

/// Size notification circuits for horns and speakers independently.
pub fn estimate(input: &NacInput) -> NacPlan {
    let eff_nac_cap = snap(input.nac_max_amps * (1.0 - input.nac_spare_percent));
    let horn_total_a = snap(input.horn_count as f64 * input.horn_amps_each);
    let spk_total_a = snap(input.speaker_count as f64 * input.speaker_amps_each);

    let horn_nacs = circuits_for(horn_total_a, eff_nac_cap);
    let spk_nacs = circuits_for(spk_total_a, eff_nac_cap);

    debug!(eff_nac_cap, horn_total_a, spk_total_a, horn_nacs, spk_nacs, "estimated NAC circuits");

    NacPlan {
        eff_nac_cap,
        horn_total_a,
        spk_total_a,
        horn_nacs,
        spk_nacs,
        total_nacs: horn_nacs + spk_nacs,
    }
}
