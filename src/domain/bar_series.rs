//! Immutable, ordered bar sequences for one symbol.
//!
//! Both series are earliest-first. "Slice the last N" style access is exposed as
//! bounded window reads that fail with [`CprError::InsufficientData`] instead of
//! silently returning a shorter window.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::domain::candle::Bar;
use crate::domain::interval::IntradayInterval;
use crate::errors::{CprError, CprResult};
use crate::utils::maths_utils;

/// Daily bars, most-recent-last. The last bar is the session being evaluated,
/// so `yesterday` is one back from the end.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl DailySeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn require(&self, required: usize) -> CprResult<()> {
        if self.bars.len() < required {
            return Err(CprError::insufficient("daily bars", required, self.bars.len()));
        }
        Ok(())
    }

    /// Bar `offset` sessions back from the most recent one (0 = current session).
    pub fn from_end(&self, offset: usize) -> CprResult<&Bar> {
        self.require(offset + 1)?;
        Ok(&self.bars[self.bars.len() - 1 - offset])
    }

    pub fn current(&self) -> CprResult<&Bar> {
        self.from_end(0)
    }

    pub fn yesterday(&self) -> CprResult<&Bar> {
        self.from_end(1)
    }

    pub fn day_before_yesterday(&self) -> CprResult<&Bar> {
        self.from_end(2)
    }

    /// Up to `lookback` bars immediately before the current session.
    /// Errors if there is no prior bar at all.
    pub fn trailing_window(&self, lookback: usize) -> CprResult<&[Bar]> {
        let end = self.bars.len().saturating_sub(1);
        let start = end.saturating_sub(lookback);
        if lookback == 0 || start == end {
            return Err(CprError::insufficient(
                "daily bars before the current session",
                1,
                end,
            ));
        }
        Ok(&self.bars[start..end])
    }

    /// Mean daily volume over [`trailing_window`](Self::trailing_window).
    /// Blank (non-finite) volumes are gaps and are left out of the mean.
    pub fn trailing_mean_volume(&self, lookback: usize) -> CprResult<f64> {
        let volumes: Vec<f64> = self
            .trailing_window(lookback)?
            .iter()
            .map(|bar| bar.volume)
            .filter(|v| v.is_finite())
            .collect();
        maths_utils::mean(&volumes)
            .ok_or_else(|| CprError::insufficient("finite daily volumes", 1, 0))
    }
}

/// One session's intraday bars, earliest-first, tagged with the market time zone.
#[derive(Debug, Clone, PartialEq)]
pub struct IntradaySession {
    symbol: String,
    interval: IntradayInterval,
    tz: Tz,
    bars: Vec<Bar>,
}

impl IntradaySession {
    pub fn new(
        symbol: impl Into<String>,
        interval: IntradayInterval,
        tz: Tz,
        bars: Vec<Bar>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            tz,
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> IntradayInterval {
        self.interval
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> CprResult<&Bar> {
        self.bars
            .first()
            .ok_or_else(|| CprError::insufficient("intraday bars", 1, 0))
    }

    /// The opening `n` bars of the session.
    pub fn opening(&self, n: usize) -> CprResult<&[Bar]> {
        if self.bars.len() < n {
            return Err(CprError::insufficient("intraday bars", n, self.bars.len()));
        }
        Ok(&self.bars[..n])
    }

    /// First and last bar timestamps, for laying out the chart overlay.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.bars.first()?.timestamp, self.bars.last()?.timestamp))
    }

    /// Trading date of the session in market time.
    pub fn session_date(&self) -> Option<NaiveDate> {
        let first = self.bars.first()?;
        Some(
            self.tz
                .from_utc_datetime(&first.timestamp.naive_utc())
                .date_naive(),
        )
    }
}
