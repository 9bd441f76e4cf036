use serde::{Deserialize, Serialize};

use crate::config::{ANALYSIS, TrendRule};
use crate::models::cpr::CprLevels;
use crate::utils::maths_utils::pct_of;

/// Day-over-day relationship between two central pivot ranges.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum CprTrend {
    Ascending,
    Descending,
    #[strum(serialize = "Inside Value")]
    InsideValue,
    #[strum(serialize = "Outside Value")]
    OutsideValue,
    Neutral,
}

impl CprTrend {
    /// Compares `current` (yesterday) against `prior` (the day before).
    ///
    /// First match wins: ascending, descending, inside value, outside value, neutral.
    /// `bc` and `tc` are compared as computed, so when close sits below the
    /// midpoint (`tc < bc`) a nested band can come out as outside value.
    pub fn classify(current: &CprLevels, prior: &CprLevels, rule: TrendRule) -> Self {
        let pivot_up = current.pivot > prior.pivot;
        let pivot_down = current.pivot < prior.pivot;
        let strict = rule == TrendRule::Strict;

        if current.bc > prior.bc && current.tc > prior.tc && (!strict || pivot_up) {
            return CprTrend::Ascending;
        }
        if current.bc < prior.bc && current.tc < prior.tc && (!strict || pivot_down) {
            return CprTrend::Descending;
        }
        if current.bc >= prior.bc && current.tc <= prior.tc {
            return CprTrend::InsideValue;
        }
        if current.bc <= prior.bc && current.tc >= prior.tc {
            return CprTrend::OutsideValue;
        }
        CprTrend::Neutral
    }

    pub fn is_ascending(&self) -> bool {
        *self == CprTrend::Ascending
    }
}

/// Narrow CPRs tend to precede trending sessions, wide ones ranging sessions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum CprWidth {
    Narrow,
    Wide,
}

impl CprWidth {
    pub fn width_pct(levels: &CprLevels) -> f64 {
        pct_of(levels.band_width(), levels.pivot)
    }

    pub fn classify(levels: &CprLevels) -> Self {
        if Self::width_pct(levels) < ANALYSIS.cpr.narrow_width_pct {
            CprWidth::Narrow
        } else {
            CprWidth::Wide
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn band(pivot: f64, bc: f64, tc: f64) -> CprLevels {
        CprLevels {
            pivot,
            bc,
            tc,
            r1: 0.0,
            r2: 0.0,
            s1: 0.0,
            s2: 0.0,
        }
    }

    #[test]
    fn flipped_band_is_compared_as_computed() {
        // Day before closed low, so its tc sits under its bc.
        let prior = band(103.0, 106.0, 100.0);
        let current = band(103.0, 102.0, 104.0);
        assert_eq!(
            CprTrend::classify(&current, &prior, TrendRule::BcTc),
            CprTrend::OutsideValue
        );
    }

    #[test]
    fn rising_band_is_ascending() {
        let day1 = band(103.0, 100.0, 106.0);
        let day2 = band(105.0, 102.0, 108.0);
        assert_eq!(
            CprTrend::classify(&day2, &day1, TrendRule::BcTc),
            CprTrend::Ascending
        );
        assert_eq!(
            CprTrend::classify(&day1, &day2, TrendRule::BcTc),
            CprTrend::Descending
        );
    }

    #[test]
    fn strict_rule_needs_the_pivot_to_rise_as_well() {
        let prior = band(104.0, 100.0, 106.0);
        let current = band(104.0, 102.0, 108.0);
        assert_eq!(
            CprTrend::classify(&current, &prior, TrendRule::BcTc),
            CprTrend::Ascending
        );
        assert_eq!(
            CprTrend::classify(&current, &prior, TrendRule::Strict),
            CprTrend::Neutral
        );
    }

    #[test]
    fn nested_band_is_inside_value() {
        let prior = band(100.0, 98.0, 102.0);
        let current = band(100.0, 99.0, 101.0);
        assert_eq!(
            CprTrend::classify(&current, &prior, TrendRule::BcTc),
            CprTrend::InsideValue
        );
        // Identical bands nest too.
        assert_eq!(
            CprTrend::classify(&prior, &prior, TrendRule::BcTc),
            CprTrend::InsideValue
        );
    }

    #[test]
    fn engulfing_band_is_outside_value() {
        let prior = band(100.0, 99.0, 101.0);
        let current = band(100.0, 98.0, 102.0);
        assert_eq!(
            CprTrend::classify(&current, &prior, TrendRule::BcTc),
            CprTrend::OutsideValue
        );
        let touching = band(100.0, 98.0, 101.0);
        assert_eq!(
            CprTrend::classify(&touching, &prior, TrendRule::BcTc),
            CprTrend::OutsideValue
        );
    }

    #[test]
    fn labels_match_the_report_columns() {
        assert_eq!(CprTrend::InsideValue.to_string(), "Inside Value");
        assert_eq!(CprTrend::Ascending.to_string(), "Ascending");
        assert_eq!(CprWidth::Narrow.to_string(), "Narrow");
    }

    #[test]
    fn width_threshold_is_a_quarter_percent() {
        assert_eq!(CprWidth::classify(&band(100.0, 99.9, 100.1)), CprWidth::Narrow);
        assert_eq!(CprWidth::classify(&band(100.0, 99.8, 100.2)), CprWidth::Wide);
        // Close below the midpoint flips tc under bc; width is still measured.
        assert_eq!(CprWidth::classify(&band(100.0, 100.2, 99.8)), CprWidth::Wide);
    }

    proptest! {
        #[test]
        fn ascending_mirrors_descending(
            bc in 50.0f64..150.0, tc in 50.0f64..150.0, pivot in 50.0f64..150.0,
            dbc in 0.01f64..5.0, dtc in 0.01f64..5.0, dpivot in 0.01f64..5.0,
        ) {
            let prior = band(pivot, bc, tc);
            let current = band(pivot + dpivot, bc + dbc, tc + dtc);
            for rule in [TrendRule::BcTc, TrendRule::Strict] {
                prop_assert_eq!(CprTrend::classify(&current, &prior, rule), CprTrend::Ascending);
                prop_assert_eq!(CprTrend::classify(&prior, &current, rule), CprTrend::Descending);
            }
        }
    }
}
