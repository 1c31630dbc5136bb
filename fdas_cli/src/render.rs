//! Plain-text views.

use fdas_core::calculations::BomRow;
use fdas_core::floors::display_name;
use fdas_core::{DeviceKey, Estimate, FloorRegistry, ModuleCode, RuleField, RuleSet};

pub const REMINDER: &str = "Reminder: outputs are estimates only. \
    Final design must follow the panel manual, local code, voltage drop limits \
    and vendor limits, and requires professional review.";

const RULE: &str = "═══════════════════════════════════════════════════════";

fn banner(title: &str) -> String {
    format!("{RULE}\n  {title}\n{RULE}\n")
}

/// Quick summary KPIs, loop distribution and NAC loads
pub fn summary(estimate: &Estimate, rules: &RuleSet) -> String {
    let mut out = banner("FDAS ESTIMATE SUMMARY");
    let m = &estimate.module_estimate;
    let plan = &estimate.loop_plan;
    let nac = &estimate.nac_plan;

    out.push_str(&format!("  SLC points (with spare):  {}\n", estimate.slc_points));
    out.push_str(&format!("  Estimated SLC loops:      {}\n", plan.loop_count));
    out.push_str(&format!("  Total NAC circuits:       {}\n", nac.total_nacs));
    out.push_str(&format!(
        "  Modules (CT1 / CR / CC1): {} / {} / {}\n",
        m.count(ModuleCode::Ct1),
        m.count(ModuleCode::Cr),
        m.count(ModuleCode::Cc1)
    ));
    out.push_str(&format!("  Loop fill:                {}%\n", estimate.loop_fill_percent()));
    out.push_str(&format!(
        "  Loop usable cap:          {} pts/loop ({} max, {:.0}% headroom)\n",
        plan.effective_cap,
        rules.loop_max_points,
        rules.loop_spare_percent * 100.0
    ));
    out.push_str(&format!(
        "  SIM suggestion:           {}\n",
        if m.sim_suggested { "Yes" } else { "No" }
    ));

    out.push_str("\nLoop Estimation (SLC)\n");
    if plan.points_per_loop.is_empty() {
        out.push_str("  No loops required\n");
    }
    for (i, pts) in plan.points_per_loop.iter().enumerate() {
        out.push_str(&format!("  Loop {}: {} pts\n", i + 1, pts));
    }

    out.push_str("\nNAC / Notification\n");
    out.push_str(&format!("  Effective NAC capacity:    {:.2}A\n", nac.eff_nac_cap));
    out.push_str(&format!(
        "  Horn/Strobe total load:    {:.2}A -> {} NAC(s)\n",
        nac.horn_total_a, nac.horn_nacs
    ));
    out.push_str(&format!(
        "  Speaker/Strobe total load: {:.2}A -> {} NAC(s)\n",
        nac.spk_total_a, nac.spk_nacs
    ));

    out.push('\n');
    out.push_str(REMINDER);
    out.push('\n');
    out
}

fn qty(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// BOM rows as an aligned table
pub fn bom_table(rows: &[BomRow]) -> String {
    let headers = ["Item", "Qty", "Qty (with spare)", "Notes"];
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|r| [r.item.clone(), qty(r.qty), qty(r.qty_spare), r.notes.clone()])
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |fields: [&str; 4]| -> String {
        format!(
            "  {:<w0$}  {:>w1$}  {:>w2$}  {}",
            fields[0],
            fields[1],
            fields[2],
            fields[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        )
        .trim_end()
        .to_string()
    };

    let mut out = banner("BILL OF MATERIALS");
    out.push_str(&line(headers));
    out.push('\n');
    for row in &cells {
        out.push_str(&line([row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()]));
        out.push('\n');
    }
    if rows.first().map_or(true, BomRow::is_separator) {
        out.push_str("  (no devices match the search)\n");
    }
    out.push('\n');
    out.push_str(REMINDER);
    out.push('\n');
    out
}

/// Numeric rules with ranges, then the module mapping
pub fn rules_view(rules: &RuleSet) -> String {
    let mut out = banner("ESTIMATION RULES");
    for field in RuleField::ALL {
        let (min, max) = field.range();
        out.push_str(&format!(
            "  {:<22} {:>8}   [{} .. {}]  {}\n",
            field.name(),
            rules.get(field),
            min,
            max,
            field.hint()
        ));
    }

    out.push_str("\nSLC point devices\n  ");
    let keys: Vec<&str> = rules.slc_point_keys.iter().map(DeviceKey::as_str).collect();
    out.push_str(&keys.join(", "));
    out.push('\n');

    out.push_str("\nModule mapping\n");
    for (key, mapping) in &rules.default_module_per_device_key {
        out.push_str(&format!(
            "  {:<14} -> {} per {}\n",
            key.as_str(),
            mapping.module,
            mapping.per
        ));
    }
    for code in ModuleCode::ALL {
        out.push_str(&format!("  {:<4} {}\n", code.as_str(), rules.module_label(code)));
    }
    out
}

/// Floors with their non-zero device counts
pub fn floors_view(floors: &FloorRegistry) -> String {
    let mut out = banner("FLOORS");
    for (i, floor) in floors.iter().enumerate() {
        out.push_str(&format!("  #{} {}\n", i + 1, display_name(floor, i)));
        let counts: Vec<String> = floor
            .counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(k, n)| format!("{}={}", k, n))
            .collect();
        if counts.is_empty() {
            out.push_str("      (no devices)\n");
        } else {
            out.push_str(&format!("      {}\n", counts.join(", ")));
        }
    }
    out
}
