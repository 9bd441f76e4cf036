//! Configuration module for the CPR breakout screener.

pub mod analysis;

mod debug; // Private: callers go through crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig, BreakoutStrategy, ScreenerConfig, TrendRule};
pub use persistence::{
    EXPORT_FILENAME, SYMBOL_COLUMN, daily_bars_filename, intraday_bars_filename,
};
