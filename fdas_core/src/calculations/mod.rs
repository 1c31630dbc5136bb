//! # Derivation Stages
//!
//! Each stage is a pure function from its inputs to a serializable result:
//!
//! - [`aggregate`] - per-device totals, spare markup, SLC points
//! - [`loops`] - SLC loop count and per-loop distribution
//! - [`nac`] - notification circuit count from horn/speaker current
//! - [`modules`] - interface/control module quantities
//! - [`bom`] - bill-of-materials line items
//!
//! None of them can fail. Out-of-range inputs are clamped and degenerate
//! capacities produce empty plans, so callers must treat zero loops or zero
//! circuits as ordinary results.
//!
//! [`crate::estimate::Estimate`] chains the stages for a whole snapshot.

pub mod aggregate;
pub mod bom;
pub mod loops;
pub mod modules;
pub mod nac;

// Re-export commonly used types
pub use aggregate::Aggregate;
pub use bom::{BomContext, BomRow};
pub use loops::LoopPlan;
pub use modules::{ModuleEstimate, SIM_SUGGESTION_THRESHOLD};
pub use nac::{NacInput, NacPlan};
