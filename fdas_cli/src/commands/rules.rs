//! `fdas rules` - view and edit the estimation rules.

use anyhow::Result;
use clap::{Args, Subcommand};
use fdas_core::{RuleField, RuleSet};
use tracing::info;

use super::Context;
use crate::render;

/// View or edit estimation rules
#[derive(Debug, Clone, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum RulesAction {
    /// Show every rule with its valid range
    Show,

    /// Set one numeric rule; out-of-range values are clamped
    Set {
        /// Rule name, e.g. loopMaxPoints or loop-max-points
        name: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Restore every rule to its default
    Reset,
}

impl RulesArgs {
    pub fn execute(&self, ctx: &mut Context) -> Result<()> {
        let project = ctx.workspace.project();

        let (rules, message) = match &self.action {
            RulesAction::Show => {
                return ctx.emit(&project.rules, || render::rules_view(&project.rules));
            }
            RulesAction::Set { name, value } => {
                let field: RuleField = name.parse()?;
                let rules = project.rules.with_value(field, value);
                let message = format!("{} = {}", field, rules.get(field));
                (rules, message)
            }
            RulesAction::Reset => (RuleSet::default(), "Rules reset to defaults".to_string()),
        };

        let next = project.with_rules(rules);
        ctx.workspace.replace(next)?;
        info!("{}", message);

        let rules = &ctx.workspace.project().rules;
        ctx.emit(rules, || format!("[OK] {}\n", message))
    }
}
