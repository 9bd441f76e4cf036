#![allow(clippy::neg_cmp_op_on_partial_ord)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod errors;
pub mod models;
pub mod utils;

// Background screening worker
pub mod engine;

// Re-export commonly used types
pub use analysis::{ScreenReport, Screener, SymbolAnalysis, analyse_symbol};
pub use config::{BreakoutStrategy, ScreenerConfig, TrendRule};
pub use data::{BarSource, CsvBarSource, InMemoryBarSource};
pub use domain::{Bar, DailySeries, IntradayInterval, IntradaySession};
pub use errors::{CprError, CprResult};
pub use models::{BreakoutReason, BreakoutResult, CprLevels, CprTrend, CprWidth};

use std::path::PathBuf;

// CLI argument parsing
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "CPR breakout screener", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Screen a symbol list and export the qualifying symbols
    Screen {
        /// CSV with a 'Symbol' column
        #[arg(long)]
        symbols: PathBuf,
        /// Where to write the qualified symbols
        #[arg(long, default_value = config::EXPORT_FILENAME)]
        export: PathBuf,
        /// Screen symbols on a thread pool
        #[arg(long, default_value_t = false)]
        parallel: bool,
        /// Keep symbols whose CPR is not ascending
        #[arg(long, default_value_t = false)]
        any_trend: bool,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Detailed CPR and breakout read-out for one symbol
    Analyse {
        #[arg(long)]
        symbol: String,
        /// Also demand a green first candle
        #[arg(long, default_value_t = false)]
        green_first_candle: bool,
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory holding <SYMBOL>_1d.csv and <SYMBOL>_<interval>.csv files
    #[arg(long)]
    pub data_dir: PathBuf,
    /// JSON file with a ScreenerConfig; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub strategy: Option<BreakoutStrategy>,
    #[arg(long, value_enum)]
    pub interval: Option<IntradayInterval>,
    #[arg(long, value_enum)]
    pub trend_rule: Option<TrendRule>,
    /// Require trigger volume above the trailing 7-day mean
    #[arg(long, default_value_t = false)]
    pub volume_filter: bool,
}

impl CommonArgs {
    /// Layers file config (if any) and flags over `base`.
    pub fn resolve(&self, base: ScreenerConfig) -> anyhow::Result<ScreenerConfig> {
        let mut cfg = match &self.config {
            Some(path) => ScreenerConfig::load_from_path(path)?,
            None => base,
        };
        if let Some(strategy) = self.strategy {
            cfg.strategy = strategy;
        }
        if let Some(interval) = self.interval {
            cfg.interval = interval;
        }
        if let Some(rule) = self.trend_rule {
            cfg.trend_rule = rule;
        }
        if self.volume_filter {
            cfg.volume_filter = true;
        }
        Ok(cfg)
    }
}
