//! Bar files on disk, one CSV per symbol and granularity.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use itertools::Itertools;

use crate::config::{DEBUG_FLAGS, daily_bars_filename, intraday_bars_filename};
use crate::data::market_tz::market_timezone;
use crate::data::source::BarSource;
use crate::domain::{Bar, DailySeries, IntradayInterval, IntradaySession};
use crate::utils::TimeUtils;

/// Reads `<dir>/<SYMBOL>_1d.csv` and `<dir>/<SYMBOL>_<interval>.csv`.
pub struct CsvBarSource {
    directory: PathBuf,
}

impl CsvBarSource {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }
}

impl BarSource for CsvBarSource {
    fn daily_bars(&self, symbol: &str) -> Result<DailySeries> {
        let path = self.directory.join(daily_bars_filename(symbol));
        let bars = load_bars_from_csv(&path, market_timezone(symbol))?;
        Ok(DailySeries::new(symbol, bars))
    }

    fn intraday_session(
        &self,
        symbol: &str,
        interval: IntradayInterval,
    ) -> Result<IntradaySession> {
        let tz = market_timezone(symbol);
        let path = self.directory.join(intraday_bars_filename(symbol, interval));
        let bars = load_bars_from_csv(&path, tz)?;
        let bars = latest_session(drop_incomplete_rows(bars, symbol), tz);
        Ok(IntradaySession::new(symbol, interval, tz, bars))
    }

    fn signature(&self) -> &'static str {
        "csv-directory"
    }
}

/// Parse a timestamp cell to UTC.
///
/// Accepts RFC-3339 with offset, naive `YYYY-MM-DD HH:MM:SS` (read as market time),
/// a bare `YYYY-MM-DD` date (midnight UTC, so the calendar date is preserved),
/// or a Unix timestamp in seconds or milliseconds.
pub fn parse_timestamp(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, TimeUtils::NAIVE_DATETIME_FORMAT) {
        return tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, TimeUtils::STANDARD_DATE_FORMAT) {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    if let Ok(ts) = s.parse::<i64>() {
        // Detect milliseconds (13+ digits) vs seconds (10 digits)
        return if ts > 1_000_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
    }
    None
}

fn parse_price(cell: Option<&str>, column: &str, line: u64) -> Result<f64> {
    let cell = cell.ok_or_else(|| anyhow!("line {}: missing {} cell", line, column))?;
    let cell = cell.trim();
    // Empty cells are gaps in the feed, not parse errors.
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .with_context(|| format!("line {}: bad {} value {:?}", line, column, cell))
}

fn find_column(headers_lower: &[String], names: &[&str]) -> Option<usize> {
    headers_lower.iter().position(|h| names.contains(&h.as_str()))
}

/// Load bars from a CSV with a header row. Columns are found by name
/// (`timestamp`/`datetime`/`date`/`time`, `open`, `high`, `low`, `close`, `volume`).
pub fn load_bars_from_csv<P: AsRef<Path>>(path: P, tz: Tz) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open bar file: {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let headers_lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

    let ts_col = find_column(&headers_lower, &["timestamp", "datetime", "date", "time"])
        .ok_or_else(|| anyhow!("{}: no timestamp column", path.display()))?;
    let mut cols = Vec::with_capacity(5);
    for name in ["open", "high", "low", "close", "volume"] {
        let idx = find_column(&headers_lower, &[name])
            .ok_or_else(|| anyhow!("{}: no {} column", path.display(), name))?;
        cols.push((name, idx));
    }

    let mut bars = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let ts_cell = record.get(ts_col).unwrap_or("");
        let Some(timestamp) = parse_timestamp(ts_cell, tz) else {
            bail!("{} line {}: unreadable timestamp {:?}", path.display(), line, ts_cell);
        };

        let mut values = [0.0f64; 5];
        for (slot, (name, idx)) in values.iter_mut().zip(&cols) {
            *slot = parse_price(record.get(*idx), name, line)
                .with_context(|| path.display().to_string())?;
        }
        let [open, high, low, close, volume] = values;
        bars.push(Bar::new(timestamp, open, high, low, close, volume));
    }

    // Sort by timestamp to ensure chronological order
    bars.sort_by_key(|bar| bar.timestamp);
    Ok(bars)
}

/// Drop rows with a missing price; volume gaps are kept.
pub fn drop_incomplete_rows(bars: Vec<Bar>, symbol: &str) -> Vec<Bar> {
    let before = bars.len();
    let kept: Vec<Bar> = bars.into_iter().filter(|b| b.has_finite_prices()).collect();
    if DEBUG_FLAGS.print_dropped_rows && kept.len() != before {
        log::debug!("{}: dropped {} incomplete intraday rows", symbol, before - kept.len());
    }
    kept
}

/// Keep only the bars of the most recent trading date (in market time).
pub fn latest_session(bars: Vec<Bar>, tz: Tz) -> Vec<Bar> {
    let local_date = |bar: &Bar| tz.from_utc_datetime(&bar.timestamp.naive_utc()).date_naive();
    let sessions: Vec<Vec<Bar>> = bars
        .into_iter()
        .chunk_by(local_date)
        .into_iter()
        .map(|(_, group)| group.collect())
        .collect();
    sessions.into_iter().last().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn naive_datetimes_are_read_in_market_time() {
        let ts = parse_timestamp("2024-02-01 09:15:00", chrono_tz::Asia::Kolkata).unwrap();
        assert_eq!((ts.hour(), ts.minute()), (3, 45));
    }

    #[test]
    fn rfc3339_and_dates_and_epochs_parse() {
        let tz = chrono_tz::America::New_York;
        let a = parse_timestamp("2024-02-01T09:30:00-05:00", tz).unwrap();
        assert_eq!(a.hour(), 14);
        let d = parse_timestamp("2024-02-01", tz).unwrap();
        assert_eq!(d.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let s = parse_timestamp("1706797800", tz).unwrap();
        let ms = parse_timestamp("1706797800000", tz).unwrap();
        assert_eq!(s, ms);
        assert!(parse_timestamp("yesterday", tz).is_none());
    }

    #[test]
    fn latest_session_keeps_only_the_last_local_date() {
        let tz = chrono_tz::Asia::Kolkata;
        let at = |s: &str| parse_timestamp(s, tz).unwrap();
        let bars = vec![
            Bar::new(at("2024-01-31 15:25:00"), 1.0, 1.0, 1.0, 1.0, 1.0),
            Bar::new(at("2024-02-01 09:15:00"), 2.0, 2.0, 2.0, 2.0, 1.0),
            Bar::new(at("2024-02-01 09:20:00"), 3.0, 3.0, 3.0, 3.0, 1.0),
        ];
        let session = latest_session(bars, tz);
        assert_eq!(session.len(), 2);
        assert_eq!(session[0].open, 2.0);
    }

    #[test]
    fn rows_with_missing_prices_are_dropped() {
        let ts = parse_timestamp("2024-02-01", chrono_tz::Asia::Kolkata).unwrap();
        let bars = vec![
            Bar::new(ts, f64::NAN, 1.0, 1.0, 1.0, 1.0),
            Bar::new(ts, 1.0, 1.0, 1.0, 1.0, f64::NAN),
        ];
        assert_eq!(drop_incomplete_rows(bars, "X").len(), 1);
    }
}
