//! # Exports
//!
//! The two export formats:
//!
//! - **CSV**: header `Item,Qty,Qty (with spare),Notes`, every field
//!   double-quoted with embedded quotes doubled, one line per BOM row
//!   (separator and module rows included), joined with `\n`.
//! - **JSON**: one pretty-printed object holding the rule set, the floors,
//!   every derived aggregate and the BOM rows.
//!
//! ```rust
//! use fdas_core::calculations::BomRow;
//! use fdas_core::export::bom_to_csv;
//!
//! let rows = vec![BomRow::new("Smoke \"ionization\"", 3, 4, "")];
//! let csv = bom_to_csv(&rows).unwrap();
//! assert_eq!(
//!     csv,
//!     "\"Item\",\"Qty\",\"Qty (with spare)\",\"Notes\"\n\"Smoke \"\"ionization\"\"\",\"3\",\"4\",\"\""
//! );
//! ```

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

use crate::calculations::BomRow;
use crate::errors::{FdasError, FdasResult};
use crate::estimate::Estimate;
use crate::floors::FloorRegistry;
use crate::rules::RuleSet;

/// CSV header row
pub const CSV_HEADER: [&str; 4] = ["Item", "Qty", "Qty (with spare)", "Notes"];

/// Default file name for the CSV export
pub const CSV_FILE_NAME: &str = "fdas-bom.csv";

/// Default file name for the JSON export
pub const JSON_FILE_NAME: &str = "fdas-config-export.json";

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_FILE_NAME,
            ExportFormat::Json => JSON_FILE_NAME,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

fn csv_error(e: impl std::fmt::Display) -> FdasError {
    FdasError::export_error("csv", e.to_string())
}

/// Render BOM rows as CSV text (no trailing newline).
pub fn bom_to_csv(rows: &[BomRow]) -> FdasResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for row in rows {
        writer.write_record(row.fields()).map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(csv_error)?;
    let mut text = String::from_utf8(bytes).map_err(csv_error)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Everything written to the JSON export.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload<'a> {
    pub rules: &'a RuleSet,
    pub floors: &'a FloorRegistry,
    #[serde(flatten)]
    pub estimate: &'a Estimate,
    pub bom_rows: &'a [BomRow],
}

/// Render the JSON export, pretty-printed.
pub fn to_json(payload: &ExportPayload<'_>) -> FdasResult<String> {
    serde_json::to_string_pretty(payload)
        .map_err(|e| FdasError::export_error("json", e.to_string()))
}
