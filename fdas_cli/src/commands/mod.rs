//! Command handlers.
//!
//! Each subcommand group has an `Args` struct with an `execute` method
//! taking the shared [`Context`].

pub mod export;
pub mod floor;
pub mod rules;

use anyhow::Result;
use serde::Serialize;

use crate::workspace::Workspace;

pub use export::ExportArgs;
pub use floor::FloorArgs;
pub use rules::RulesArgs;

/// State shared by every estimator command
pub struct Context {
    pub workspace: Workspace,
    pub json: bool,
}

impl Context {
    /// Print `value` as pretty JSON in `--json` mode, otherwise the text view.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }
}
