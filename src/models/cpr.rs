use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::errors::CprResult;

/// Central Pivot Range and the classic floor-pivot levels for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CprLevels {
    pub pivot: f64,
    /// Bottom central: midpoint of the range.
    pub bc: f64,
    /// Top central: bc mirrored through the pivot.
    pub tc: f64,
    pub r1: f64,
    pub r2: f64,
    pub s1: f64,
    pub s2: f64,
}

impl CprLevels {
    /// Derives the levels from a session's high, low and close.
    pub fn from_bar(bar: &Bar) -> CprResult<Self> {
        bar.validate()?;
        Ok(Self::from_hlc(bar.high, bar.low, bar.close))
    }

    /// Unchecked form of [`from_bar`](Self::from_bar); callers guarantee finite inputs with `high >= low`.
    pub fn from_hlc(high: f64, low: f64, close: f64) -> Self {
        let pivot = (high + low + close) / 3.0;
        let bc = (high + low) / 2.0;
        let tc = 2.0 * pivot - bc;
        let range = high - low;
        CprLevels {
            pivot,
            bc,
            tc,
            r1: 2.0 * pivot - low,
            s1: 2.0 * pivot - high,
            r2: pivot + range,
            s2: pivot - range,
        }
    }

    /// Lower edge of the central band (bc and tc swap when close is below the midpoint).
    pub fn band_low(&self) -> f64 {
        self.bc.min(self.tc)
    }

    pub fn band_high(&self) -> f64 {
        self.bc.max(self.tc)
    }

    pub fn band_width(&self) -> f64 {
        (self.tc - self.bc).abs()
    }
}

impl std::fmt::Display for CprLevels {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pivot={:.2}, BC={:.2}, TC={:.2}, R1={:.2}, R2={:.2}, S1={:.2}, S2={:.2}",
            self.pivot, self.bc, self.tc, self.r1, self.r2, self.s1, self.s2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::test_bars::daily;
    use crate::errors::CprError;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn symmetric_session_puts_every_level_on_a_round_number() {
        let levels = CprLevels::from_bar(&daily(0, 110.0, 90.0, 100.0, 0.0)).unwrap();
        assert!(approx(levels.pivot, 100.0));
        assert!(approx(levels.bc, 100.0));
        assert!(approx(levels.tc, 100.0));
        assert!(approx(levels.r1, 110.0));
        assert!(approx(levels.s1, 90.0));
        assert!(approx(levels.r2, 120.0));
        assert!(approx(levels.s2, 80.0));
    }

    #[test]
    fn close_above_midpoint_lifts_tc_over_bc() {
        let levels = CprLevels::from_hlc(110.0, 100.0, 108.0);
        assert!(levels.tc > levels.bc);
        assert!(approx(levels.band_low(), levels.bc));
        assert!(approx(levels.band_width(), levels.tc - levels.bc));
    }

    #[test]
    fn inverted_bar_is_rejected() {
        let err = CprLevels::from_bar(&daily(0, 90.0, 110.0, 100.0, 0.0)).unwrap_err();
        assert!(matches!(err, CprError::InvalidBar(_)));
    }

    #[test]
    fn display_rounds_to_two_places() {
        let text = CprLevels::from_hlc(110.0, 90.0, 100.0).to_string();
        assert!(text.starts_with("Pivot=100.00, BC=100.00"), "{}", text);
    }

    proptest! {
        #[test]
        fn level_identities_hold(low in 1.0f64..10_000.0, span in 0.0f64..500.0, frac in 0.0f64..=1.0) {
            let high = low + span;
            let close = low + span * frac;
            let a = CprLevels::from_hlc(high, low, close);
            let b = CprLevels::from_hlc(high, low, close);
            prop_assert_eq!(a, b);
            prop_assert_eq!(a.tc, 2.0 * a.pivot - a.bc);
            prop_assert!((a.r1 + a.s1 - 2.0 * a.pivot).abs() < 1e-6);
            prop_assert!((a.r2 - a.s2 - 2.0 * (high - low)).abs() < 1e-6);
            prop_assert!(a.s2 <= a.s1 + 1e-9);
            prop_assert!(a.s1 <= a.band_low() + 1e-9);
            prop_assert!(a.band_high() <= a.r1 + 1e-9);
            prop_assert!(a.r1 <= a.r2 + 1e-9);
        }
    }
}
