//! Delimited export of qualifying symbols.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::ScreenRow;

/// One CSV line. Field order is the column order.
#[derive(Serialize)]
struct ExportRecord<'a> {
    #[serde(rename = "Symbol")]
    symbol: &'a str,
    #[serde(rename = "Trigger Open")]
    trigger_open: String,
    #[serde(rename = "Trigger Close")]
    trigger_close: String,
    #[serde(rename = "Yesterday High")]
    yesterday_high: String,
    #[serde(rename = "CPR Trend")]
    trend: String,
    #[serde(rename = "CPR Width")]
    width: String,
}

impl<'a> From<&'a ScreenRow> for ExportRecord<'a> {
    fn from(row: &'a ScreenRow) -> Self {
        Self {
            symbol: &row.symbol,
            trigger_open: format!("{:.2}", row.trigger_open),
            trigger_close: format!("{:.2}", row.trigger_close),
            yesterday_high: format!("{:.2}", row.yesterday_high),
            trend: row.trend.to_string(),
            width: row.width.to_string(),
        }
    }
}

pub const EXPORT_HEADER: [&str; 6] = [
    "Symbol",
    "Trigger Open",
    "Trigger Close",
    "Yesterday High",
    "CPR Trend",
    "CPR Width",
];

pub fn write_rows<W: Write>(writer: W, rows: &[&ScreenRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        // serde only emits the header alongside the first record
        csv_writer.write_record(EXPORT_HEADER)?;
    }
    for row in rows {
        csv_writer.serialize(ExportRecord::from(*row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_rows<P: AsRef<Path>>(path: P, rows: &[&ScreenRow]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    write_rows(file, rows).with_context(|| format!("Failed to write export: {}", path.display()))
}
