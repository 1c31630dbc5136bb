//! # SLC Loop Allocator
//!
//! Splits the total addressable points over as few Signaling Line Circuit
//! loops as the usable loop capacity allows, then spreads the points as
//! evenly as possible.
//!
//! ## Algorithm
//!
//! ```text
//! effectiveCap = floor(loopMaxPoints × (1 − loopSparePercent))
//! effectiveCap ≤ 0  →  no loops (degenerate, not an error)
//! loopCount    = max(1, ceil(totalPoints / effectiveCap))
//! base, rem    = totalPoints ÷ loopCount
//! loop i       = base + 1 for i < rem, else base
//! ```
//!
//! Loop sizes therefore differ by at most one point and always sum to
//! `totalPoints`. Zero points still yields one (empty) loop.
//!
//! ## Example
//!
//! ```rust
//! use fdas_core::calculations::loops::allocate;
//!
//! let plan = allocate(450, 250, 0.2);
//! assert_eq!(plan.effective_cap, 200);
//! assert_eq!(plan.loop_count, 3);
//! assert_eq!(plan.points_per_loop, vec![150, 150, 150]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::numeric::floor_signed;

/// Result of spreading points over SLC loops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopPlan {
    /// Number of loops required (0 only when capacity is degenerate)
    pub loop_count: u64,

    /// Points assigned to each loop, in loop order
    pub points_per_loop: Vec<u64>,

    /// Usable points per loop after headroom
    pub effective_cap: u64,
}

impl LoopPlan {
    /// The degenerate plan for a non-positive usable capacity
    pub fn empty() -> Self {
        LoopPlan {
            loop_count: 0,
            points_per_loop: Vec::new(),
            effective_cap: 0,
        }
    }

    /// Sum of points across loops
    pub fn total_points(&self) -> u64 {
        self.points_per_loop.iter().sum()
    }

    /// How full the planned loops are, as a whole percentage of usable
    /// capacity (capped at 100). Zero when there is no usable capacity.
    pub fn fill_percent(&self, total_points: u64) -> u32 {
        if self.effective_cap == 0 || self.loop_count == 0 {
            return 0;
        }
        let capacity = (self.loop_count * self.effective_cap) as f64;
        let pct = (total_points as f64 / capacity * 100.0).round();
        pct.min(100.0).max(0.0) as u32
    }
}

/// Usable points per loop, or `None` when headroom leaves nothing.
pub fn effective_capacity(loop_max_points: u32, loop_spare_percent: f64) -> Option<u64> {
    let spare = if loop_spare_percent.is_nan() { 0.0 } else { loop_spare_percent };
    let cap = floor_signed(f64::from(loop_max_points) * (1.0 - spare));
    if cap <= 0 {
        None
    } else {
        Some(cap as u64)
    }
}

/// Distribute `total_points` across SLC loops.
pub fn allocate(total_points: u64, loop_max_points: u32, loop_spare_percent: f64) -> LoopPlan {
    let Some(effective_cap) = effective_capacity(loop_max_points, loop_spare_percent) else {
        debug!(loop_max_points, loop_spare_percent, "no usable loop capacity");
        return LoopPlan::empty();
    };

    let loop_count = total_points.div_ceil(effective_cap).max(1);
    let base = total_points / loop_count;
    let remainder = total_points % loop_count;

    let points_per_loop = (0..loop_count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect();

    debug!(total_points, effective_cap, loop_count, "allocated SLC loops");

    LoopPlan {
        loop_count,
        points_per_loop,
        effective_cap,
    }
}
