//! # BOM Builder
//!
//! Flattens the estimate into bill-of-materials line items:
//!
//! 1. one row per catalog device whose label matches the search text
//!    (catalog order, case-insensitive substring),
//! 2. a separator row,
//! 3. fixed module rows: CT1, CR, CC1, then the suggested SIM.
//!
//! The search text only filters device rows; module rows are always present.
//!
//! ## Example
//!
//! ```rust
//! use fdas_core::calculations::bom::{build, SEPARATOR};
//! use fdas_core::estimate::Estimate;
//! use fdas_core::floors::FloorRegistry;
//! use fdas_core::rules::RuleSet;
//!
//! let rules = RuleSet::default();
//! let estimate = Estimate::derive(&rules, &FloorRegistry::default());
//!
//! let rows = build(&estimate.bom_context(&rules), "strobe");
//! assert_eq!(rows[0].item, "Horn/Strobe");
//! assert_eq!(rows[2].item, SEPARATOR);
//! assert_eq!(rows.len(), 2 + 1 + 4);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{filter_catalog, DeviceCounts, DeviceKey};
use crate::calculations::modules::ModuleEstimate;
use crate::calculations::nac::NacPlan;
use crate::rules::{ModuleCode, RuleSet};

/// Item text of the row separating devices from modules
pub const SEPARATOR: &str = "—";

/// One BOM line item. Quantities are empty on the separator row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomRow {
    pub item: String,
    pub qty: Option<u64>,
    pub qty_spare: Option<u64>,
    pub notes: String,
}

impl BomRow {
    pub fn new(
        item: impl Into<String>,
        qty: u64,
        qty_spare: u64,
        notes: impl Into<String>,
    ) -> Self {
        BomRow {
            item: item.into(),
            qty: Some(qty),
            qty_spare: Some(qty_spare),
            notes: notes.into(),
        }
    }

    pub fn separator() -> Self {
        BomRow {
            item: SEPARATOR.to_string(),
            qty: None,
            qty_spare: None,
            notes: String::new(),
        }
    }

    pub fn is_separator(&self) -> bool {
        self.item == SEPARATOR && self.qty.is_none()
    }

    /// Row as four text fields: item, qty, qty with spare, notes
    pub fn fields(&self) -> [String; 4] {
        [
            self.item.clone(),
            self.qty.map(|q| q.to_string()).unwrap_or_default(),
            self.qty_spare.map(|q| q.to_string()).unwrap_or_default(),
            self.notes.clone(),
        ]
    }
}

/// Everything the BOM draws from, borrowed from one estimate snapshot.
#[derive(Debug, Clone, Copy)]
pub struct BomContext<'a> {
    pub rules: &'a RuleSet,
    pub totals: &'a DeviceCounts,
    pub totals_with_spare: &'a DeviceCounts,
    pub modules: &'a ModuleEstimate,
    pub nac: &'a NacPlan,
}

fn device_note(key: DeviceKey, rules: &RuleSet) -> String {
    match key {
        DeviceKey::HornStrobe => {
            format!("Assumed NAC load: {:.2}A each", rules.horn_strobe_amps_each)
        }
        DeviceKey::SpeakerStrobe => {
            format!("Assumed NAC load: {:.2}A each", rules.speaker_strobe_amps_each)
        }
        _ => String::new(),
    }
}

/// Build BOM rows, filtering device rows by `search`.
pub fn build(ctx: &BomContext<'_>, search: &str) -> Vec<BomRow> {
    let mut rows: Vec<BomRow> = filter_catalog(search)
        .map(|device| {
            BomRow::new(
                device.label,
                ctx.totals.get(device.key),
                ctx.totals_with_spare.get(device.key),
                device_note(device.key, ctx.rules),
            )
        })
        .collect();
    let device_rows = rows.len();

    rows.push(BomRow::separator());

    let ct1 = ctx.modules.count(ModuleCode::Ct1);
    rows.push(BomRow::new(
        ctx.rules.module_label(ModuleCode::Ct1),
        ct1,
        ct1,
        "Based on WFS/TS mapping",
    ));

    let cr = ctx.modules.count(ModuleCode::Cr);
    rows.push(BomRow::new(ctx.rules.module_label(ModuleCode::Cr), cr, cr, "Based on MD mapping"));

    let cc1 = ctx.modules.count(ModuleCode::Cc1);
    rows.push(BomRow::new(
        ctx.rules.module_label(ModuleCode::Cc1),
        cc1,
        cc1,
        format!("Based on estimated NACs ({})", ctx.nac.total_nacs),
    ));

    let sim = ctx.modules.sim_quantity();
    rows.push(BomRow::new(
        format!("{} (suggestion)", ctx.rules.module_label(ModuleCode::Sim)),
        sim,
        sim,
        if ctx.modules.sim_suggested {
            "Suggested due to annunciator qty"
        } else {
            "Not suggested"
        },
    ));

    debug!(search, device_rows, total_rows = rows.len(), "built BOM");
    rows
}
