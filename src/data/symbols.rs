use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::config::SYMBOL_COLUMN;

/// Read a symbol list CSV (must have a `Symbol` column). Blank cells are skipped
/// and duplicates kept, so output order matches the file.
pub fn load_symbols<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open symbol list: {}", path.display()))?;
    read_symbols(reader).with_context(|| format!("Failed to read symbol list: {}", path.display()))
}

pub fn read_symbols<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<String>> {
    let col = reader
        .headers()?
        .iter()
        .position(|h| h.eq_ignore_ascii_case(SYMBOL_COLUMN))
        .ok_or_else(|| anyhow!("no '{}' column", SYMBOL_COLUMN))?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(symbol) = record.get(col).filter(|s| !s.is_empty()) {
            symbols.push(symbol.to_string());
        }
    }
    Ok(symbols)
}
