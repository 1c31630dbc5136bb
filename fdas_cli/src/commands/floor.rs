//! `fdas floor` - edit the floor registry of the input document.
//!
//! Floors are addressed by their 1-based number as shown in `floor list`.

use anyhow::Result;
use clap::{Args, Subcommand};
use fdas_core::floors::display_name;
use fdas_core::numeric::parse_number;
use fdas_core::{DeviceKey, FdasError, FdasResult, FloorRegistry};
use tracing::info;

use super::Context;
use crate::render;

/// Edit floors in the estimate document
#[derive(Debug, Clone, Args)]
pub struct FloorArgs {
    #[command(subcommand)]
    pub action: FloorAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum FloorAction {
    /// List floors and their non-zero device counts
    List,

    /// Append a floor (named "Floor N" unless --name is given)
    Add {
        #[arg(long)]
        name: Option<String>,
    },

    /// Rename a floor
    Rename {
        /// Floor number (1-based)
        floor: usize,
        name: String,
    },

    /// Reset every device count on a floor to zero
    Clear {
        /// Floor number (1-based)
        floor: usize,
    },

    /// Remove a floor (the last remaining floor cannot be removed)
    Remove {
        /// Floor number (1-based)
        floor: usize,
    },

    /// Set one device count on a floor
    Set {
        /// Floor number (1-based)
        floor: usize,
        /// Device key, e.g. smoke, hornStrobe, horn-strobe
        device: String,
        /// Count; clamped to 0..=99999, non-numeric text counts as 0
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

/// Registry index for a 1-based floor number
fn floor_index(number: usize, floors: &FloorRegistry) -> FdasResult<usize> {
    if number == 0 || number > floors.len() {
        return Err(FdasError::floor_not_found(number, floors.len()));
    }
    Ok(number - 1)
}

impl FloorArgs {
    pub fn execute(&self, ctx: &mut Context) -> Result<()> {
        let project = ctx.workspace.project();
        let mut floors = project.floors.clone();

        let message = match &self.action {
            FloorAction::List => {
                return ctx.emit(&project.floors, || render::floors_view(&project.floors));
            }
            FloorAction::Add { name } => {
                let idx = floors.add();
                if let Some(name) = name {
                    floors.rename(idx, name.as_str())?;
                }
                format!("Added floor #{} {}", idx + 1, floors_name(&floors, idx))
            }
            FloorAction::Rename { floor, name } => {
                let idx = floor_index(*floor, &floors)?;
                floors.rename(idx, name.as_str())?;
                format!("Renamed floor #{} to {}", floor, floors_name(&floors, idx))
            }
            FloorAction::Clear { floor } => {
                let idx = floor_index(*floor, &floors)?;
                floors.clear(idx)?;
                format!("Cleared floor #{} {}", floor, floors_name(&floors, idx))
            }
            FloorAction::Remove { floor } => {
                let idx = floor_index(*floor, &floors)?;
                let removed = floors.remove(idx)?;
                format!("Removed floor #{} {}", floor, display_name(&removed, idx))
            }
            FloorAction::Set { floor, device, value } => {
                let idx = floor_index(*floor, &floors)?;
                let key: DeviceKey = device.parse()?;
                floors.set_count(idx, key, parse_number(value))?;
                let applied = floors.get(idx).map(|f| f.counts.get(key)).unwrap_or_default();
                format!("Set {} on floor #{} to {}", key.entry().label, floor, applied)
            }
        };

        let next = project.with_floors(floors);
        ctx.workspace.replace(next)?;
        info!("{}", message);

        let floors = &ctx.workspace.project().floors;
        ctx.emit(floors, || format!("[OK] {}\n", message))
    }
}

fn floors_name(floors: &FloorRegistry, idx: usize) -> String {
    floors.get(idx).map(|f| display_name(f, idx)).unwrap_or_default()
}
