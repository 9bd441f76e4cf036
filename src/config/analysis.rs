//! Analysis and computation configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::IntradayInterval;

/// Settings for CPR derivation and width classification
pub struct CprSettings {
    // (tc - bc) / pivot, in percent, below which the CPR counts as narrow
    pub narrow_width_pct: f64,
    // Daily bars needed for yesterday's CPR (yesterday + current session)
    pub min_daily_bars_for_cpr: usize,
    // Daily bars needed to compare yesterday's CPR with the day before
    pub min_daily_bars_for_trend: usize,
}

/// Settings for the volume confirmation gate
pub struct VolumeSettings {
    // Daily bars (before the current session) averaged for the volume gate
    pub lookback_days: usize,
}

/// Settings for the breakout patterns
pub struct PatternSettings {
    // Opening candles inspected by the three-candle pattern
    pub three_candle_count: usize,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub cpr: CprSettings,
    pub volume: VolumeSettings,
    pub pattern: PatternSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    cpr: CprSettings {
        narrow_width_pct: 0.25,
        min_daily_bars_for_cpr: 2,
        min_daily_bars_for_trend: 3,
    },
    volume: VolumeSettings { lookback_days: 7 },
    pattern: PatternSettings {
        three_candle_count: 3,
    },
};

/// Which breakout test to apply to the session's opening candles.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum BreakoutStrategy {
    #[default]
    #[strum(serialize = "First-Candle")]
    FirstCandle,
    #[strum(serialize = "Three-Candle")]
    ThreeCandle,
}

/// How strictly a CPR must move to count as ascending/descending.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum TrendRule {
    /// BC and TC both move.
    #[default]
    BcTc,
    /// BC, TC and pivot all move.
    Strict,
}

/// Runtime options for a screen or a single-symbol analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub strategy: BreakoutStrategy,
    pub volume_filter: bool,
    /// First-candle strategy only: also demand close > open.
    pub require_green_first_candle: bool,
    /// Screener only: drop symbols whose CPR is not ascending.
    pub require_ascending_trend: bool,
    pub trend_rule: TrendRule,
    pub interval: IntradayInterval,
    /// Evaluate symbols on the rayon pool (order is still preserved).
    pub parallel: bool,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            strategy: BreakoutStrategy::FirstCandle,
            volume_filter: false,
            require_green_first_candle: true,
            require_ascending_trend: true,
            trend_rule: TrendRule::BcTc,
            interval: IntradayInterval::FiveMin,
            parallel: false,
        }
    }
}

impl ScreenerConfig {
    /// Defaults for the single-symbol run: no green-candle or trend gate.
    pub fn single_symbol() -> Self {
        Self {
            require_green_first_candle: false,
            require_ascending_trend: false,
            ..Self::default()
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: ScreenerConfig =
            serde_json::from_str(r#"{"strategy":"three-candle","interval":"15m"}"#).unwrap();
        assert_eq!(cfg.strategy, BreakoutStrategy::ThreeCandle);
        assert_eq!(cfg.interval, IntradayInterval::FifteenMin);
        assert!(!cfg.volume_filter);
        assert!(cfg.require_ascending_trend);
    }

    #[test]
    fn single_symbol_defaults_drop_the_screen_gates() {
        let cfg = ScreenerConfig::single_symbol();
        assert!(!cfg.require_green_first_candle);
        assert!(!cfg.require_ascending_trend);
        assert_eq!(cfg.strategy, BreakoutStrategy::FirstCandle);
    }
}
