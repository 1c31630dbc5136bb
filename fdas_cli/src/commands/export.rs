//! `fdas export` - write the BOM CSV or the full JSON export.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use fdas_core::export::{bom_to_csv, to_json, ExportFormat, ExportPayload};
use fdas_core::write_export;
use tracing::info;

use super::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// Bill of materials as CSV
    Csv,
    /// Rules, floors, derived aggregates and BOM rows as JSON
    Json,
}

impl From<ExportKind> for ExportFormat {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Csv => ExportFormat::Csv,
            ExportKind::Json => ExportFormat::Json,
        }
    }
}

/// Export the estimate
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub format: ExportKind,

    /// Only include devices whose label contains this text
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Output path, `-` for stdout (defaults to fdas-bom.csv / fdas-config-export.json)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn execute(&self, ctx: &Context) -> Result<()> {
        let project = ctx.workspace.project();
        let estimate = project.estimate();
        let rows = estimate.bom_rows(&project.rules, &self.search);
        let format = ExportFormat::from(self.format);

        let text = match format {
            ExportFormat::Csv => bom_to_csv(&rows)?,
            ExportFormat::Json => to_json(&ExportPayload {
                rules: &project.rules,
                floors: &project.floors,
                estimate: &estimate,
                bom_rows: &rows,
            })?,
        };

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format.default_file_name()));

        if output.as_os_str() == "-" {
            println!("{}", text);
            return Ok(());
        }

        write_export(&output, &text)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!(format = format.as_str(), path = %output.display(), rows = rows.len(), "exported");
        println!("[OK] Exported {} to {}", format.as_str().to_uppercase(), output.display());
        Ok(())
    }
}
