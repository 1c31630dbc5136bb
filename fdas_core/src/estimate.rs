//! # Estimate
//!
//! Runs every derivation stage over one `(RuleSet, FloorRegistry)` snapshot
//! and keeps the results together.
//!
//! ```text
//! floors ─┐
//!         ├─ aggregate ─┬─ loops
//! rules ──┘             ├─ nac ── modules
//!                       └──────── bom (on demand, with search text)
//! ```
//!
//! Nothing is cached between snapshots: after any edit, derive again.
//! Deriving twice from identical inputs yields identical estimates.
//!
//! ## Example
//!
//! ```rust
//! use fdas_core::catalog::DeviceKey;
//! use fdas_core::estimate::Estimate;
//! use fdas_core::floors::FloorRegistry;
//! use fdas_core::rules::RuleSet;
//!
//! let rules = RuleSet::default();
//! let mut floors = FloorRegistry::single("Ground Floor");
//! floors.set_count(0, DeviceKey::Smoke, 100.0).unwrap();
//!
//! let est = Estimate::derive(&rules, &floors);
//! assert_eq!(est.slc_points, 110);
//! assert_eq!(est.loop_plan.loop_count, 1);
//! assert_eq!(est.loop_fill_percent(), 55);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::bom::{self, BomContext, BomRow};
use crate::calculations::modules::{self, ModuleEstimate};
use crate::calculations::nac::{self, NacInput, NacPlan};
use crate::calculations::{aggregate, loops, LoopPlan};
use crate::catalog::DeviceCounts;
use crate::floors::FloorRegistry;
use crate::rules::RuleSet;

/// All derived aggregates for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub totals: DeviceCounts,
    pub totals_with_spare: DeviceCounts,
    pub slc_points: u64,
    pub loop_plan: LoopPlan,
    pub nac_plan: NacPlan,
    pub module_estimate: ModuleEstimate,
}

impl Estimate {
    /// Derive every aggregate from a snapshot.
    pub fn derive(rules: &RuleSet, floors: &FloorRegistry) -> Self {
        let agg = aggregate::calculate(floors.as_slice(), rules);

        let loop_plan = loops::allocate(
            agg.slc_points,
            rules.loop_max_points,
            rules.loop_spare_percent,
        );

        let nac_plan = nac::estimate(&NacInput::from_rules(rules, &agg.totals_with_spare));

        let module_estimate = modules::estimate(
            &agg.totals_with_spare,
            &rules.default_module_per_device_key,
            nac_plan.total_nacs,
            rules.cc1_per_nac,
        );

        debug!(
            slc_points = agg.slc_points,
            loops = loop_plan.loop_count,
            nacs = nac_plan.total_nacs,
            "derived estimate"
        );

        Estimate {
            totals: agg.totals,
            totals_with_spare: agg.totals_with_spare,
            slc_points: agg.slc_points,
            loop_plan,
            nac_plan,
            module_estimate,
        }
    }

    /// Borrow this estimate as BOM input. `rules` must be the snapshot the
    /// estimate was derived from for labels and notes to agree.
    pub fn bom_context<'a>(&'a self, rules: &'a RuleSet) -> BomContext<'a> {
        BomContext {
            rules,
            totals: &self.totals,
            totals_with_spare: &self.totals_with_spare,
            modules: &self.module_estimate,
            nac: &self.nac_plan,
        }
    }

    /// BOM line items, device rows filtered by `search`
    pub fn bom_rows(&self, rules: &RuleSet, search: &str) -> Vec<BomRow> {
        bom::build(&self.bom_context(rules), search)
    }

    /// Loop utilization shown on the dashboard, 0–100
    pub fn loop_fill_percent(&self) -> u32 {
        self.loop_plan.fill_percent(self.slc_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DeviceKey;
    use crate::rules::{ModuleCode, RuleField};

    fn single_floor(counts: &[(DeviceKey, f64)]) -> FloorRegistry {
        let mut floors = FloorRegistry::single("Ground Floor");
        for (key, value) in counts {
            floors.set_count(0, *key, *value).unwrap();
        }
        floors
    }

    #[test]
    fn test_default_smoke_scenario() {
        let floors = single_floor(&[(DeviceKey::Smoke, 100.0)]);
        let est = Estimate::derive(&RuleSet::default(), &floors);
        assert_eq!(est.totals.get(DeviceKey::Smoke), 100);
        assert_eq!(est.totals_with_spare.get(DeviceKey::Smoke), 110);
        assert_eq!(est.slc_points, 110);
        assert_eq!(est.loop_plan.effective_cap, 200);
        assert_eq!(est.loop_plan.loop_count, 1);
        assert_eq!(est.loop_plan.points_per_loop, vec![110]);
        assert_eq!(est.nac_plan.total_nacs, 0);
    }

    #[test]
    fn test_empty_building() {
        let est = Estimate::derive(&RuleSet::default(), &FloorRegistry::default());
        assert_eq!(est.slc_points, 0);
        assert_eq!(est.loop_plan.loop_count, 1);
        assert_eq!(est.loop_plan.points_per_loop, vec![0]);
        assert_eq!(est.nac_plan.total_nacs, 0);
        assert_eq!(est.loop_fill_percent(), 0);
        assert!(!est.module_estimate.sim_suggested);
    }

    #[test]
    fn test_loop_points_sum_to_slc_points() {
        let mut floors = FloorRegistry::default();
        for i in 0..floors.len() {
            floors.set_count(i, DeviceKey::Smoke, 173.0 + i as f64).unwrap();
            floors.set_count(i, DeviceKey::Heat, 41.0).unwrap();
            floors.set_count(i, DeviceKey::Mps, 12.0).unwrap();
            floors.set_count(i, DeviceKey::HornStrobe, 30.0).unwrap();
        }
        let est = Estimate::derive(&RuleSet::default(), &floors);
        assert_eq!(est.loop_plan.total_points(), est.slc_points);
        assert_eq!(est.loop_plan.loop_count, est.slc_points.div_ceil(200));
    }

    #[test]
    fn test_rule_edit_changes_result() {
        let floors = single_floor(&[(DeviceKey::Smoke, 300.0)]);
        let rules = RuleSet::default();
        let before = Estimate::derive(&rules, &floors);
        assert_eq!(before.loop_plan.loop_count, 2);

        let edited = rules.with_value(RuleField::LoopMaxPoints, "500");
        let after = Estimate::derive(&edited, &floors);
        assert_eq!(after.loop_plan.effective_cap, 400);
        assert_eq!(after.loop_plan.loop_count, 1);
    }

    #[test]
    fn test_nacs_feed_cc1_modules() {
        let floors = single_floor(&[
            (DeviceKey::HornStrobe, 50.0),
            (DeviceKey::SpeakerStrobe, 20.0),
        ]);
        let est = Estimate::derive(&RuleSet::default(), &floors);
        // horns 55 * 0.10 = 5.5A -> 4; speakers 22 * 0.11 = 2.42A -> 2
        assert_eq!(est.nac_plan.horn_nacs, 4);
        assert_eq!(est.nac_plan.spk_nacs, 2);
        assert_eq!(est.module_estimate.count(ModuleCode::Cc1), 6);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let floors = single_floor(&[
            (DeviceKey::Smoke, 77.0),
            (DeviceKey::Ann, 7.0),
            (DeviceKey::Md, 3.0),
        ]);
        let rules = RuleSet::default();
        assert_eq!(Estimate::derive(&rules, &floors), Estimate::derive(&rules, &floors));
    }

    #[test]
    fn test_annunciator_threshold_uses_spared_count() {
        // 7 raw annunciators -> 8 with spare
        let est = Estimate::derive(&RuleSet::default(), &single_floor(&[(DeviceKey::Ann, 7.0)]));
        assert_eq!(est.totals_with_spare.get(DeviceKey::Ann), 8);
        assert!(est.module_estimate.sim_suggested);

        let mut rules = RuleSet::default();
        rules.spare_percent = 0.0;
        let est = Estimate::derive(&rules, &single_floor(&[(DeviceKey::Ann, 7.0)]));
        assert!(!est.module_estimate.sim_suggested);
    }

    #[test]
    fn test_serialized_keys() {
        let est = Estimate::derive(&RuleSet::default(), &FloorRegistry::default());
        let json = serde_json::to_value(&est).unwrap();
        for key in [
            "totals",
            "totalsWithSpare",
            "slcPoints",
            "loopPlan",
            "nacPlan",
            "moduleEstimate",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
