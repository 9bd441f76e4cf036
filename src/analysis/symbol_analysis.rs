use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::analysis::breakout::{PriorSession, VolumeGate, detect_breakout};
use crate::config::{ANALYSIS, BreakoutStrategy, ScreenerConfig};
use crate::domain::{DailySeries, IntradaySession};
use crate::errors::{CprError, CprResult};
use crate::models::{BreakoutResult, CprLevels, CprTrend, CprWidth};

/// Full read-out for one symbol: levels, trend, width, breakout verdict and
/// the overlay a candlestick chart needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub yesterday: CprLevels,
    pub yesterday_high: f64,
    /// `None` when only two daily bars were supplied.
    pub trend: Option<CprTrend>,
    pub width: CprWidth,
    pub width_pct: f64,
    pub breakout: BreakoutResult,
    pub overlay: ChartOverlay,
}

/// Colour hint for the CPR band: bullish when the session opened above the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneTone {
    AbovePivot,
    AtOrBelowPivot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum LevelKind {
    #[strum(serialize = "Yday High")]
    YesterdayHigh,
    R1,
    R2,
    S1,
    S2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelLine {
    pub kind: LevelKind,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOverlay {
    pub tz: Tz,
    pub zone_start: DateTime<Utc>,
    pub zone_end: DateTime<Utc>,
    /// Lower and upper edge of the CPR band.
    pub zone_low: f64,
    pub zone_high: f64,
    pub zone_tone: ZoneTone,
    pub lines: Vec<LevelLine>,
    /// Only set for a qualifying breakout.
    pub marker: Option<(DateTime<Utc>, f64)>,
}

impl ChartOverlay {
    fn build(
        levels: &CprLevels,
        yesterday_high: f64,
        session: &IntradaySession,
        breakout: &BreakoutResult,
    ) -> CprResult<Self> {
        let first = session.first()?;
        let (zone_start, zone_end) = session
            .span()
            .ok_or_else(|| CprError::insufficient("intraday bars", 1, 0))?;
        let zone_tone = if first.close > levels.pivot {
            ZoneTone::AbovePivot
        } else {
            ZoneTone::AtOrBelowPivot
        };
        let lines = vec![
            LevelLine { kind: LevelKind::YesterdayHigh, price: yesterday_high },
            LevelLine { kind: LevelKind::R1, price: levels.r1 },
            LevelLine { kind: LevelKind::R2, price: levels.r2 },
            LevelLine { kind: LevelKind::S1, price: levels.s1 },
            LevelLine { kind: LevelKind::S2, price: levels.s2 },
        ];
        let marker = breakout
            .trigger
            .as_ref()
            .filter(|_| breakout.qualifies)
            .map(|t| (t.timestamp, t.close));

        Ok(Self {
            tz: session.tz(),
            zone_start,
            zone_end,
            zone_low: levels.band_low(),
            zone_high: levels.band_high(),
            zone_tone,
            lines,
            marker,
        })
    }
}

/// Yesterday's CPR, the day before's (if any) and the trend between them.
pub(crate) struct PriorContext {
    pub levels: CprLevels,
    pub high: f64,
    pub trend: Option<CprTrend>,
}

pub(crate) fn prior_context(daily: &DailySeries, config: &ScreenerConfig) -> CprResult<PriorContext> {
    daily.require(ANALYSIS.cpr.min_daily_bars_for_cpr)?;
    let yesterday = daily.yesterday()?;
    let levels = CprLevels::from_bar(yesterday)?;

    let trend = if daily.len() >= ANALYSIS.cpr.min_daily_bars_for_trend {
        let before = CprLevels::from_bar(daily.day_before_yesterday()?)?;
        Some(CprTrend::classify(&levels, &before, config.trend_rule))
    } else {
        None
    };

    Ok(PriorContext {
        levels,
        high: yesterday.high,
        trend,
    })
}

pub(crate) fn volume_gate(daily: &DailySeries, config: &ScreenerConfig) -> CprResult<VolumeGate> {
    if !config.volume_filter {
        return Ok(VolumeGate::Off);
    }
    let mean = daily.trailing_mean_volume(ANALYSIS.volume.lookback_days)?;
    Ok(VolumeGate::Above(mean))
}

/// Single-symbol run. Insufficient data is terminal here and comes back as `Err`.
pub fn analyse_symbol(
    daily: &DailySeries,
    session: &IntradaySession,
    config: &ScreenerConfig,
) -> CprResult<SymbolAnalysis> {
    if config.strategy == BreakoutStrategy::ThreeCandle {
        daily.require(ANALYSIS.cpr.min_daily_bars_for_trend)?;
        session.opening(ANALYSIS.pattern.three_candle_count)?;
    }
    let prior = prior_context(daily, config)?;
    if session.is_empty() {
        return Err(CprError::insufficient("intraday bars", 1, 0));
    }
    let gate = volume_gate(daily, config)?;

    let breakout = detect_breakout(
        config,
        session.bars(),
        PriorSession {
            levels: &prior.levels,
            high: prior.high,
            trend: prior.trend,
        },
        gate,
    );
    let overlay = ChartOverlay::build(&prior.levels, prior.high, session, &breakout)?;

    log::debug!(
        "{}: {} | trend {:?} | {}",
        daily.symbol(),
        prior.levels,
        prior.trend,
        breakout.reason
    );

    Ok(SymbolAnalysis {
        symbol: daily.symbol().to_string(),
        yesterday: prior.levels,
        yesterday_high: prior.high,
        trend: prior.trend,
        width: CprWidth::classify(&prior.levels),
        width_pct: CprWidth::width_pct(&prior.levels),
        breakout,
        overlay,
    })
}
