//! # Module Estimator
//!
//! Converts device totals into interface/control module quantities.
//!
//! 1. Every known module code starts at zero.
//! 2. Each `device → {module, per}` mapping adds `ceil(totalsWithSpare[device] / per)`
//!    to its module. Mappings naming an unknown module code are skipped.
//! 3. Notification circuits add `totalNacs × cc1PerNAC` NAC control modules.
//! 4. A serial interface module is suggested once the spared annunciator
//!    count reaches [`SIM_SUGGESTION_THRESHOLD`].
//!
//! ## Example
//!
//! ```rust
//! use fdas_core::calculations::modules::estimate;
//! use fdas_core::catalog::{DeviceCounts, DeviceKey};
//! use fdas_core::rules::{ModuleCode, RuleSet};
//!
//! let rules = RuleSet::default();
//! let totals: DeviceCounts = [(DeviceKey::Wfs, 11), (DeviceKey::Ann, 8)].into_iter().collect();
//!
//! let est = estimate(&totals, &rules.default_module_per_device_key, 3, rules.cc1_per_nac);
//! assert_eq!(est.count(ModuleCode::Ct1), 11);
//! assert_eq!(est.count(ModuleCode::Cc1), 3);
//! assert!(est.sim_suggested);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{DeviceCounts, DeviceKey};
use crate::numeric::div_ceil;
use crate::rules::{ModuleCode, ModuleMapping};

/// Spared annunciator count at which a serial interface module is suggested.
///
/// Fixed rather than part of the rule set.
pub const SIM_SUGGESTION_THRESHOLD: u64 = 8;

/// Module quantities plus the serial-interface suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEstimate {
    pub module_counts: BTreeMap<ModuleCode, u64>,
    pub sim_suggested: bool,
}

impl ModuleEstimate {
    /// Quantity for a module code (zero when absent)
    pub fn count(&self, code: ModuleCode) -> u64 {
        self.module_counts.get(&code).copied().unwrap_or(0)
    }

    /// BOM quantity of the suggested serial module: 1 when suggested
    pub fn sim_quantity(&self) -> u64 {
        u64::from(self.sim_suggested)
    }
}

/// Estimate module quantities.
///
/// `total_nacs` comes from the NAC plan; `cc1_per_nac` is applied as given.
/// A value of 0 yields no NAC-driven CC1 modules; it is not promoted to 1.
pub fn estimate(
    totals_with_spare: &DeviceCounts,
    mapping: &BTreeMap<DeviceKey, ModuleMapping>,
    total_nacs: u64,
    cc1_per_nac: u32,
) -> ModuleEstimate {
    let mut module_counts: BTreeMap<ModuleCode, u64> =
        ModuleCode::ALL.iter().map(|m| (*m, 0)).collect();

    for (device, cfg) in mapping {
        let Some(code) = ModuleCode::from_code(&cfg.module) else {
            warn!(
                device = device.as_str(),
                module = %cfg.module,
                "ignoring unrecognized module code"
            );
            continue;
        };
        let qty = totals_with_spare.get(*device);
        *module_counts.entry(code).or_insert(0) += div_ceil(qty, u64::from(cfg.per));
    }

    *module_counts.entry(ModuleCode::Cc1).or_insert(0) += total_nacs * u64::from(cc1_per_nac);

    let sim_suggested = totals_with_spare.get(DeviceKey::Ann) >= SIM_SUGGESTION_THRESHOLD;

    debug!(?module_counts, sim_suggested, "estimated modules");

    ModuleEstimate {
        module_counts,
        sim_suggested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;

    fn totals(pairs: &[(DeviceKey, u64)]) -> DeviceCounts {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_all_known_codes_present() {
        let rules = RuleSet::default();
        let est = estimate(&DeviceCounts::zeroed(), &rules.default_module_per_device_key, 0, 1);
        assert_eq!(est.module_counts.len(), 4);
        assert!(est.module_counts.values().all(|v| *v == 0));
        assert!(!est.sim_suggested);
    }

    #[test]
    fn test_wfs_scenario() {
        // wfs = 10 raw, 11 with the default 10% spare
        let rules = RuleSet::default();
        let t = totals(&[(DeviceKey::Wfs, 11)]);
        let est = estimate(&t, &rules.default_module_per_device_key, 0, 1);
        assert_eq!(est.count(ModuleCode::Ct1), 11);
    }

    #[test]
    fn test_default_mapping() {
        let rules = RuleSet::default();
        let t = totals(&[(DeviceKey::Wfs, 4), (DeviceKey::Ts, 6), (DeviceKey::Md, 3)]);
        let est = estimate(&t, &rules.default_module_per_device_key, 5, 1);
        assert_eq!(est.count(ModuleCode::Ct1), 10);
        assert_eq!(est.count(ModuleCode::Cr), 3);
        assert_eq!(est.count(ModuleCode::Cc1), 5);
        assert_eq!(est.count(ModuleCode::Sim), 0);
    }

    #[test]
    fn test_per_groups_round_up() {
        let mut mapping = BTreeMap::new();
        mapping.insert(DeviceKey::Fjt, ModuleMapping::new(ModuleCode::Ct1, 4));
        let est = estimate(&totals(&[(DeviceKey::Fjt, 9)]), &mapping, 0, 1);
        assert_eq!(est.count(ModuleCode::Ct1), 3);
    }

    #[test]
    fn test_unknown_module_code_ignored() {
        let mut mapping = BTreeMap::new();
        mapping.insert(
            DeviceKey::Smoke,
            ModuleMapping {
                module: "XYZ-9".to_string(),
                per: 1,
            },
        );
        mapping.insert(DeviceKey::Md, ModuleMapping::new(ModuleCode::Cr, 1));
        let est = estimate(&totals(&[(DeviceKey::Smoke, 50), (DeviceKey::Md, 2)]), &mapping, 0, 1);
        assert_eq!(est.module_counts.len(), 4);
        assert_eq!(est.count(ModuleCode::Cr), 2);
        assert_eq!(est.module_counts.values().sum::<u64>(), 2);
    }

    #[test]
    fn test_cc1_per_nac_multiplies() {
        let est = estimate(&DeviceCounts::zeroed(), &BTreeMap::new(), 4, 2);
        assert_eq!(est.count(ModuleCode::Cc1), 8);
        let est = estimate(&DeviceCounts::zeroed(), &BTreeMap::new(), 4, 0);
        assert_eq!(est.count(ModuleCode::Cc1), 0);
    }

    #[test]
    fn test_sim_threshold() {
        let map = BTreeMap::new();
        let at = estimate(&totals(&[(DeviceKey::Ann, 8)]), &map, 0, 1);
        assert!(at.sim_suggested);
        assert_eq!(at.sim_quantity(), 1);

        let below = estimate(&totals(&[(DeviceKey::Ann, 7)]), &map, 0, 1);
        assert!(!below.sim_suggested);
        assert_eq!(below.sim_quantity(), 0);
    }

    #[test]
    fn test_serialization() {
        let est = estimate(&totals(&[(DeviceKey::Ann, 9)]), &BTreeMap::new(), 2, 1);
        let json = serde_json::to_value(&est).unwrap();
        assert_eq!(json["moduleCounts"]["CC1"], 2);
        assert_eq!(json["moduleCounts"]["CT1"], 0);
        assert_eq!(json["simSuggested"], true);
    }
}
