use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CprError, CprResult};

// Define the CandleType enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    /// close > open
    Bullish,
    /// close < open
    Bearish,
    /// close == open
    Doji,
}

/// A single OHLCV bar. Daily and intraday bars share this shape; the series
/// that holds them carries the granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    // A method to determine the type of candle.
    // Flat candles are neither green nor red, so the breakout patterns never treat them as either.
    pub fn get_type(&self) -> CandleType {
        if self.close > self.open {
            CandleType::Bullish
        } else if self.close < self.open {
            CandleType::Bearish
        } else {
            CandleType::Doji
        }
    }

    pub fn is_green(&self) -> bool {
        self.get_type() == CandleType::Bullish
    }

    pub fn is_red(&self) -> bool {
        self.get_type() == CandleType::Bearish
    }

    pub fn has_finite_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Checks the fields the CPR maths depends on: finite high/low/close and `high >= low`.
    /// A blank volume is tolerated, a negative one is not.
    pub fn validate(&self) -> CprResult<()> {
        for (name, value) in [("high", self.high), ("low", self.low), ("close", self.close)] {
            if !value.is_finite() {
                return Err(CprError::InvalidBar(format!(
                    "{} is not finite ({}) at {}",
                    name, value, self.timestamp
                )));
            }
        }
        if self.volume < 0.0 {
            return Err(CprError::InvalidBar(format!(
                "negative volume {} at {}",
                self.volume, self.timestamp
            )));
        }
        if self.high < self.low {
            return Err(CprError::InvalidBar(format!(
                "high {} below low {} at {}",
                self.high, self.low, self.timestamp
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_bars {
    use super::Bar;
    use chrono::{Duration, TimeZone, Utc};

    /// Daily bar on 2024-01-01 + `day` days.
    pub fn daily(day: i64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day);
        Bar::new(ts, (high + low) / 2.0, high, low, close, volume)
    }

    /// 5-minute bar `idx` of the 2024-02-01 session.
    pub fn intraday(idx: i64, open: f64, close: f64, volume: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 2, 1, 14, 30, 0).unwrap() + Duration::minutes(5 * idx);
        Bar::new(ts, open, open.max(close) + 0.5, open.min(close) - 0.5, close, volume)
    }
}
