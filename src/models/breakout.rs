use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::BreakoutStrategy;
use crate::domain::Bar;

/// Why a breakout check did or did not qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum BreakoutReason {
    #[strum(serialize = "breakout confirmed")]
    Confirmed,
    #[strum(serialize = "close not above yesterday's high")]
    BelowYesterdayHigh,
    #[strum(serialize = "close not above R1")]
    BelowR1,
    #[strum(serialize = "first candle not green")]
    NotGreen,
    #[strum(serialize = "candles are not green/red/green")]
    PatternMismatch,
    #[strum(serialize = "insufficient volume")]
    InsufficientVolume,
    #[strum(serialize = "insufficient volume on trigger candle")]
    InsufficientVolumeOnTrigger,
    #[strum(serialize = "insufficient data")]
    InsufficientData,
    #[strum(serialize = "not applicable")]
    NotApplicable,
}

impl BreakoutReason {
    /// Price action was there but the volume gate rejected it.
    pub fn is_volume_rejection(&self) -> bool {
        matches!(
            self,
            BreakoutReason::InsufficientVolume | BreakoutReason::InsufficientVolumeOnTrigger
        )
    }
}

/// The candle that decided the check, for the chart marker and the report row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerCandle {
    /// Position within the session (0 = opening candle).
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub close: f64,
    pub volume: f64,
}

impl TriggerCandle {
    pub fn from_bar(index: usize, bar: &Bar) -> Self {
        Self {
            index,
            timestamp: bar.timestamp,
            open: bar.open,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutResult {
    pub strategy: BreakoutStrategy,
    pub qualifies: bool,
    pub reason: BreakoutReason,
    /// Present whenever the strategy got as far as picking its candle.
    pub trigger: Option<TriggerCandle>,
    /// Volume bar the trigger had to beat, when the gate ran.
    pub volume_threshold: Option<f64>,
}

impl BreakoutResult {
    pub fn qualified(strategy: BreakoutStrategy, trigger: TriggerCandle) -> Self {
        Self {
            strategy,
            qualifies: true,
            reason: BreakoutReason::Confirmed,
            trigger: Some(trigger),
            volume_threshold: None,
        }
    }

    pub fn rejected(
        strategy: BreakoutStrategy,
        reason: BreakoutReason,
        trigger: Option<TriggerCandle>,
    ) -> Self {
        Self {
            strategy,
            qualifies: false,
            reason,
            trigger,
            volume_threshold: None,
        }
    }

    pub fn with_volume_threshold(mut self, threshold: f64) -> Self {
        self.volume_threshold = Some(threshold);
        self
    }

    pub fn trigger_price(&self) -> Option<f64> {
        self.trigger.as_ref().map(|t| t.close)
    }

    pub fn trigger_index(&self) -> Option<usize> {
        self.trigger.as_ref().map(|t| t.index)
    }
}
