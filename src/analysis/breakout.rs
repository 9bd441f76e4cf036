//! Opening-range breakout checks against yesterday's CPR.
//!
//! Both strategies are pure functions of their inputs. Short or empty sessions
//! produce a non-qualifying result with [`BreakoutReason::InsufficientData`].

use crate::config::{ANALYSIS, BreakoutStrategy, ScreenerConfig};
use crate::domain::Bar;
use crate::models::{BreakoutReason, BreakoutResult, CprLevels, CprTrend, TriggerCandle};

/// Volume confirmation for the trigger candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeGate {
    Off,
    /// Trigger volume must be strictly above this (trailing mean daily volume).
    Above(f64),
}

impl VolumeGate {
    fn passes(&self, volume: f64) -> bool {
        match self {
            VolumeGate::Off => true,
            VolumeGate::Above(threshold) => volume > *threshold,
        }
    }

    fn threshold(&self) -> Option<f64> {
        match self {
            VolumeGate::Off => None,
            VolumeGate::Above(threshold) => Some(*threshold),
        }
    }
}

/// Everything a breakout check needs about the prior session.
#[derive(Debug, Clone, Copy)]
pub struct PriorSession<'a> {
    pub levels: &'a CprLevels,
    pub high: f64,
    /// Yesterday vs the day before; `None` when history is too short to compare.
    pub trend: Option<CprTrend>,
}

/// Runs the strategy selected in `config` over the session's bars.
pub fn detect_breakout(
    config: &ScreenerConfig,
    bars: &[Bar],
    prior: PriorSession<'_>,
    gate: VolumeGate,
) -> BreakoutResult {
    match config.strategy {
        BreakoutStrategy::FirstCandle => {
            first_candle_breakout(bars, prior.high, gate, config.require_green_first_candle)
        }
        BreakoutStrategy::ThreeCandle => three_candle_breakout(bars, prior, gate),
    }
}

/// Opening candle closes above yesterday's high, optionally green and on volume.
pub fn first_candle_breakout(
    bars: &[Bar],
    yesterday_high: f64,
    gate: VolumeGate,
    require_green: bool,
) -> BreakoutResult {
    let strategy = BreakoutStrategy::FirstCandle;
    let Some(first) = bars.first() else {
        return BreakoutResult::rejected(strategy, BreakoutReason::InsufficientData, None);
    };
    let trigger = TriggerCandle::from_bar(0, first);

    if !(first.close > yesterday_high) {
        return BreakoutResult::rejected(strategy, BreakoutReason::BelowYesterdayHigh, Some(trigger));
    }
    if require_green && !first.is_green() {
        return BreakoutResult::rejected(strategy, BreakoutReason::NotGreen, Some(trigger));
    }

    let result = if gate.passes(first.volume) {
        BreakoutResult::qualified(strategy, trigger)
    } else {
        BreakoutResult::rejected(strategy, BreakoutReason::InsufficientVolume, Some(trigger))
    };
    match gate.threshold() {
        Some(threshold) => result.with_volume_threshold(threshold),
        None => result,
    }
}

/// Green, red, green opening candles in an ascending CPR, the third closing
/// above both yesterday's high and R1.
pub fn three_candle_breakout(
    bars: &[Bar],
    prior: PriorSession<'_>,
    gate: VolumeGate,
) -> BreakoutResult {
    let strategy = BreakoutStrategy::ThreeCandle;
    let count = ANALYSIS.pattern.three_candle_count;
    if bars.len() < count {
        return BreakoutResult::rejected(strategy, BreakoutReason::InsufficientData, None);
    }
    if !prior.trend.is_some_and(|t| t.is_ascending()) {
        return BreakoutResult::rejected(strategy, BreakoutReason::NotApplicable, None);
    }

    let (c1, c2, c3) = (&bars[0], &bars[1], &bars[2]);
    let trigger = TriggerCandle::from_bar(count - 1, c3);

    if !(c1.is_green() && c2.is_red() && c3.is_green()) {
        return BreakoutResult::rejected(strategy, BreakoutReason::PatternMismatch, Some(trigger));
    }
    if !(c3.close > prior.high) {
        return BreakoutResult::rejected(strategy, BreakoutReason::BelowYesterdayHigh, Some(trigger));
    }
    if !(c3.close > prior.levels.r1) {
        return BreakoutResult::rejected(strategy, BreakoutReason::BelowR1, Some(trigger));
    }

    let result = if gate.passes(c3.volume) {
        BreakoutResult::qualified(strategy, trigger)
    } else {
        BreakoutResult::rejected(
            strategy,
            BreakoutReason::InsufficientVolumeOnTrigger,
            Some(trigger),
        )
    };
    match gate.threshold() {
        Some(threshold) => result.with_volume_threshold(threshold),
        None => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::test_bars::intraday;
    use proptest::prelude::*;

    fn levels_with_r1(r1: f64) -> CprLevels {
        CprLevels {
            r1,
            ..CprLevels::from_hlc(150.0, 140.0, 148.0)
        }
    }

    fn prior<'a>(levels: &'a CprLevels, trend: Option<CprTrend>) -> PriorSession<'a> {
        PriorSession {
            levels,
            high: 150.0,
            trend,
        }
    }

    #[test]
    fn first_candle_above_yesterday_high_qualifies() {
        let bars = vec![intraday(0, 151.0, 155.0, 500.0)];
        let result = first_candle_breakout(&bars, 150.0, VolumeGate::Off, false);
        assert!(result.qualifies);
        assert_eq!(result.reason, BreakoutReason::Confirmed);
        assert_eq!(result.trigger_index(), Some(0));
        assert_eq!(result.trigger_price(), Some(155.0));
    }

    #[test]
    fn first_candle_volume_gate_rejects_thin_volume() {
        let bars = vec![intraday(0, 151.0, 155.0, 900.0)];
        let result = first_candle_breakout(&bars, 150.0, VolumeGate::Above(1000.0), false);
        assert!(!result.qualifies);
        assert_eq!(result.reason.to_string(), "insufficient volume");
        assert_eq!(result.volume_threshold, Some(1000.0));
    }

    #[test]
    fn first_candle_below_high_is_not_a_volume_rejection() {
        let bars = vec![intraday(0, 149.0, 149.5, 5.0)];
        let result = first_candle_breakout(&bars, 150.0, VolumeGate::Above(1000.0), false);
        assert_eq!(result.reason, BreakoutReason::BelowYesterdayHigh);
        assert!(!result.reason.is_volume_rejection());
    }

    #[test]
    fn green_confirmation_is_optional() {
        // Gapped up above yesterday's high but sold off inside the candle.
        let bars = vec![intraday(0, 158.0, 155.0, 500.0)];
        assert!(first_candle_breakout(&bars, 150.0, VolumeGate::Off, false).qualifies);
        let strict = first_candle_breakout(&bars, 150.0, VolumeGate::Off, true);
        assert_eq!(strict.reason, BreakoutReason::NotGreen);
    }

    #[test]
    fn empty_session_reports_insufficient_data() {
        let result = first_candle_breakout(&[], 150.0, VolumeGate::Off, false);
        assert!(!result.qualifies);
        assert_eq!(result.reason, BreakoutReason::InsufficientData);
        assert!(result.trigger.is_none());
    }

    #[test]
    fn three_candle_pattern_qualifies() {
        let levels = levels_with_r1(155.0);
        let bars = vec![
            intraday(0, 150.0, 153.0, 100.0),
            intraday(1, 153.0, 151.0, 100.0),
            intraday(2, 151.0, 160.0, 100.0),
        ];
        let result = three_candle_breakout(&bars, prior(&levels, Some(CprTrend::Ascending)), VolumeGate::Off);
        assert!(result.qualifies, "{:?}", result);
        assert_eq!(result.trigger_index(), Some(2));
        assert_eq!(result.trigger_price(), Some(160.0));
    }

    #[test]
    fn three_candle_needs_three_bars() {
        let levels = levels_with_r1(155.0);
        let bars = vec![intraday(0, 150.0, 153.0, 100.0), intraday(1, 153.0, 151.0, 100.0)];
        let result = three_candle_breakout(&bars, prior(&levels, Some(CprTrend::Ascending)), VolumeGate::Off);
        assert!(!result.qualifies);
        assert_eq!(result.reason, BreakoutReason::InsufficientData);
    }

    #[test]
    fn three_candle_checks_r1_and_shape() {
        let levels = levels_with_r1(165.0);
        let bars = vec![
            intraday(0, 150.0, 153.0, 100.0),
            intraday(1, 153.0, 151.0, 100.0),
            intraday(2, 151.0, 160.0, 100.0),
        ];
        let p = prior(&levels, Some(CprTrend::Ascending));
        assert_eq!(three_candle_breakout(&bars, p, VolumeGate::Off).reason, BreakoutReason::BelowR1);

        let red_third = vec![bars[0].clone(), bars[1].clone(), intraday(2, 170.0, 166.0, 100.0)];
        assert_eq!(
            three_candle_breakout(&red_third, p, VolumeGate::Off).reason,
            BreakoutReason::PatternMismatch
        );
    }

    #[test]
    fn three_candle_volume_gate_uses_trigger_candle() {
        let levels = levels_with_r1(155.0);
        let bars = vec![
            intraday(0, 150.0, 153.0, 5_000.0),
            intraday(1, 153.0, 151.0, 5_000.0),
            intraday(2, 151.0, 160.0, 10.0),
        ];
        let result = three_candle_breakout(
            &bars,
            prior(&levels, Some(CprTrend::Ascending)),
            VolumeGate::Above(1000.0),
        );
        assert_eq!(result.reason, BreakoutReason::InsufficientVolumeOnTrigger);
    }

    #[test]
    fn dispatch_follows_configured_strategy() {
        let levels = levels_with_r1(155.0);
        let bars = vec![intraday(0, 151.0, 155.0, 500.0)];
        let config = ScreenerConfig {
            strategy: BreakoutStrategy::ThreeCandle,
            ..ScreenerConfig::single_symbol()
        };
        let result = detect_breakout(&config, &bars, prior(&levels, Some(CprTrend::Ascending)), VolumeGate::Off);
        assert_eq!(result.strategy, BreakoutStrategy::ThreeCandle);
        assert_eq!(result.reason, BreakoutReason::InsufficientData);
    }

    fn any_trend() -> impl Strategy<Value = Option<CprTrend>> {
        prop_oneof![
            Just(None),
            Just(Some(CprTrend::Descending)),
            Just(Some(CprTrend::InsideValue)),
            Just(Some(CprTrend::OutsideValue)),
            Just(Some(CprTrend::Neutral)),
        ]
    }

    proptest! {
        #[test]
        fn three_candle_never_fires_without_ascending_cpr(
            trend in any_trend(),
            prices in proptest::collection::vec((100.0f64..200.0, 100.0f64..200.0), 0..6),
        ) {
            let levels = levels_with_r1(120.0);
            let bars: Vec<Bar> = prices
                .iter()
                .enumerate()
                .map(|(i, (o, c))| intraday(i as i64, *o, *c, 1e9))
                .collect();
            let result = three_candle_breakout(&bars, prior(&levels, trend), VolumeGate::Off);
            prop_assert!(!result.qualifies);
        }

        #[test]
        fn first_candle_never_fires_on_volume_at_or_below_mean(
            open in 100.0f64..200.0, close in 100.0f64..400.0,
            mean in 1.0f64..1e6, fraction in 0.0f64..=1.0,
        ) {
            let bars = vec![intraday(0, open, close, mean * fraction)];
            let result = first_candle_breakout(&bars, 150.0, VolumeGate::Above(mean), false);
            prop_assert!(!result.qualifies);
        }
    }
}
