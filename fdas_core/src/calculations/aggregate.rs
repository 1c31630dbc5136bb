//! # Aggregator
//!
//! Sums device counts across all floors, then applies the BOM spare:
//!
//! ```text
//! totals[k]           = Σ floor[k]
//! totalsWithSpare[k]  = ceil(totals[k] × (1 + sparePercent))
//! slcPoints           = Σ totalsWithSpare[k]  for k in slcPointKeys
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fdas_core::calculations::aggregate::calculate;
//! use fdas_core::catalog::DeviceKey;
//! use fdas_core::floors::{Floor, FloorRegistry};
//! use fdas_core::rules::RuleSet;
//!
//! let mut floors = FloorRegistry::single("Ground Floor");
//! floors.set_count(0, DeviceKey::Smoke, 100.0).unwrap();
//!
//! let agg = calculate(floors.as_slice(), &RuleSet::default());
//! assert_eq!(agg.totals.get(DeviceKey::Smoke), 100);
//! assert_eq!(agg.totals_with_spare.get(DeviceKey::Smoke), 110);
//! assert_eq!(agg.slc_points, 110);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{DeviceCounts, DeviceKey};
use crate::floors::Floor;
use crate::numeric::{ceil_count, clamp_number};
use crate::rules::RuleSet;

/// Device totals before and after the spare markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    /// Raw per-device sum across floors
    pub totals: DeviceCounts,

    /// Totals scaled by `1 + sparePercent`, rounded up per device
    pub totals_with_spare: DeviceCounts,

    /// Addressable points after spare
    pub slc_points: u64,
}

/// Sum every catalog device across `floors`. Keys missing from a floor
/// count as zero.
pub fn sum_floors(floors: &[Floor]) -> DeviceCounts {
    let mut totals = DeviceCounts::zeroed();
    for floor in floors {
        for key in DeviceKey::ALL {
            totals.add(key, floor.counts.get(key));
        }
    }
    totals
}

/// Apply the spare markup. `spare_percent` is clamped to `[0, 1]`.
pub fn apply_spare(totals: &DeviceCounts, spare_percent: f64) -> DeviceCounts {
    let factor = 1.0 + clamp_number(spare_percent, 0.0, 1.0);
    totals
        .iter()
        .map(|(key, qty)| (key, ceil_count(qty as f64 * factor)))
        .collect()
}

/// Total SLC points contributed by `keys`
pub fn slc_points(totals_with_spare: &DeviceCounts, keys: &BTreeSet<DeviceKey>) -> u64 {
    keys.iter().map(|k| totals_with_spare.get(*k)).sum()
}

/// Run the aggregation stage.
pub fn calculate(floors: &[Floor], rules: &RuleSet) -> Aggregate {
    let totals = sum_floors(floors);
    let totals_with_spare = apply_spare(&totals, rules.spare_percent);
    let slc_points = slc_points(&totals_with_spare, &rules.slc_point_keys);

    debug!(
        floors = floors.len(),
        devices = totals.total(),
        devices_with_spare = totals_with_spare.total(),
        slc_points,
        "aggregated floor counts"
    );

    Aggregate {
        totals,
        totals_with_spare,
        slc_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor(name: &str, counts: &[(DeviceKey, f64)]) -> Floor {
        counts
            .iter()
            .fold(Floor::empty(name), |f, (k, v)| f.with_count(*k, *v))
    }

    #[test]
    fn test_sum_across_floors() {
        let floors = vec![
            floor("G", &[(DeviceKey::Smoke, 10.0), (DeviceKey::Heat, 2.0)]),
            floor("2", &[(DeviceKey::Smoke, 15.0), (DeviceKey::Mps, 4.0)]),
            floor("3", &[]),
        ];
        let totals = sum_floors(&floors);
        assert_eq!(totals.get(DeviceKey::Smoke), 25);
        assert_eq!(totals.get(DeviceKey::Heat), 2);
        assert_eq!(totals.get(DeviceKey::Mps), 4);
        assert_eq!(totals.get(DeviceKey::Ann), 0);
        assert_eq!(totals.iter().count(), DeviceKey::ALL.len());
    }

    #[test]
    fn test_spare_rounds_up_per_device() {
        let totals: DeviceCounts = [
            (DeviceKey::Smoke, 7),
            (DeviceKey::Heat, 0),
            (DeviceKey::Wfs, 10),
        ]
        .into_iter()
        .collect();
        let spared = apply_spare(&totals, 0.1);
        // 7 * 1.1 = 7.7 -> 8
        assert_eq!(spared.get(DeviceKey::Smoke), 8);
        assert_eq!(spared.get(DeviceKey::Heat), 0);
        assert_eq!(spared.get(DeviceKey::Wfs), 11);
    }

    #[test]
    fn test_spare_never_below_totals() {
        for spare in [0.0, 0.05, 0.1, 0.15, 0.33, 0.5, 1.0] {
            for qty in 0..200u64 {
                let totals: DeviceCounts = [(DeviceKey::Smoke, qty)].into_iter().collect();
                let spared = apply_spare(&totals, spare).get(DeviceKey::Smoke);
                assert!(spared >= qty, "qty {} spare {} gave {}", qty, spare, spared);
                assert!((spared as f64) >= qty as f64 * (1.0 + spare) - 1e-6);
                assert!((spared as f64) < qty as f64 * (1.0 + spare) + 1.0);
            }
        }
    }

    #[test]
    fn test_spare_out_of_range_is_clamped() {
        let totals: DeviceCounts = [(DeviceKey::Smoke, 10)].into_iter().collect();
        assert_eq!(apply_spare(&totals, -0.5).get(DeviceKey::Smoke), 10);
        assert_eq!(apply_spare(&totals, 3.0).get(DeviceKey::Smoke), 20);
        assert_eq!(apply_spare(&totals, f64::NAN).get(DeviceKey::Smoke), 10);
    }

    #[test]
    fn test_slc_points_only_counts_point_keys() {
        let floors = vec![floor(
            "G",
            &[(DeviceKey::Smoke, 100.0), (DeviceKey::HornStrobe, 50.0), (DeviceKey::Ts, 10.0)],
        )];
        let agg = calculate(&floors, &RuleSet::default());
        // smoke 110 + ts 11; horns excluded
        assert_eq!(agg.slc_points, 121);
    }

    #[test]
    fn test_custom_point_keys() {
        let mut rules = RuleSet::default();
        rules.slc_point_keys = [DeviceKey::Smoke].into_iter().collect();
        let floors = vec![floor("G", &[(DeviceKey::Smoke, 10.0), (DeviceKey::Heat, 10.0)])];
        assert_eq!(calculate(&floors, &rules).slc_points, 11);
    }

    #[test]
    fn test_default_scenario() {
        let floors = vec![floor("G", &[(DeviceKey::Smoke, 100.0)])];
        let agg = calculate(&floors, &RuleSet::default());
        assert_eq!(agg.totals.get(DeviceKey::Smoke), 100);
        assert_eq!(agg.totals_with_spare.get(DeviceKey::Smoke), 110);
        assert_eq!(agg.slc_points, 110);
    }
}
