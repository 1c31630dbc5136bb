//! # fdas_core - Fire Detection & Alarm System Estimation Engine
//!
//! `fdas_core` turns per-floor device counts and a small set of configurable
//! engineering rules into SLC loop counts, notification circuit (NAC) counts,
//! interface module quantities and a bill of materials.
//!
//! Outputs are rough estimates. Final designs must follow the panel manual,
//! local code, voltage drop limits and vendor limits, and need professional
//! review.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: every derived value is a pure function of one
//!   `(RuleSet, FloorRegistry)` snapshot
//! - **Total**: malformed numbers are clamped, degenerate capacities give
//!   empty plans; derivation never returns an error
//! - **JSON-First**: all types implement Serialize/Deserialize with the
//!   camelCase names used in exports
//!
//! ## Quick Start
//!
//! ```rust
//! use fdas_core::catalog::DeviceKey;
//! use fdas_core::project::Project;
//!
//! let mut project = Project::new("Tower B", "Estimator");
//! project.floors.set_count(0, DeviceKey::Smoke, 100.0).unwrap();
//!
//! let estimate = project.estimate();
//! assert_eq!(estimate.slc_points, 110);
//! assert_eq!(estimate.loop_plan.points_per_loop, vec![110]);
//!
//! let rows = estimate.bom_rows(&project.rules, "");
//! let csv = fdas_core::export::bom_to_csv(&rows).unwrap();
//! assert!(csv.starts_with("\"Item\",\"Qty\""));
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - The fixed device catalog and per-device counts
//! - [`rules`] - Configurable rule set and module codes
//! - [`floors`] - Floor registry (never empty)
//! - [`calculations`] - Aggregator, loop/NAC allocators, module estimator, BOM builder
//! - [`estimate`] - All derived aggregates for one snapshot
//! - [`export`] - CSV and JSON exports
//! - [`project`] - Input document (rules + floors + metadata)
//! - [`file_io`] - Atomic writes and validated loads
//! - [`numeric`] - Clamping and rounding helpers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod catalog;
pub mod errors;
pub mod estimate;
pub mod export;
pub mod file_io;
pub mod floors;
pub mod numeric;
pub mod project;
pub mod rules;

// Re-export commonly used types at crate root for convenience
pub use catalog::{DeviceKey, DEVICE_CATALOG};
pub use errors::{FdasError, FdasResult};
pub use estimate::Estimate;
pub use file_io::{load_project, save_project, write_export};
pub use floors::{Floor, FloorRegistry};
pub use project::{Project, ProjectMetadata};
pub use rules::{ModuleCode, RuleField, RuleSet};
