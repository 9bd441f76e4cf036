//! File naming for bar data and exports

use crate::domain::IntradayInterval;

/// Default file name for the qualified-symbol export
pub const EXPORT_FILENAME: &str = "qualified_stocks.csv";

/// Column holding the ticker in an uploaded symbol list
pub const SYMBOL_COLUMN: &str = "Symbol";

/// Suffix used for daily bar files
pub const DAILY_SUFFIX: &str = "1d";

/// Example: "RELIANCE.NS_1d.csv"
pub fn daily_bars_filename(symbol: &str) -> String {
    format!("{}_{}.csv", symbol, DAILY_SUFFIX)
}

/// Example: "RELIANCE.NS_5m.csv"
pub fn intraday_bars_filename(symbol: &str, interval: IntradayInterval) -> String {
    format!("{}_{}.csv", symbol, interval)
}
