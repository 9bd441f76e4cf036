use statrs::statistics::Statistics;

/// Arithmetic mean, `None` for an empty slice (statrs returns NaN there).
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

/// Relative width of a band around `reference`, in percent.
pub fn pct_of(span: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return f64::INFINITY;
    }
    (span / reference).abs() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_matches_hand_computation() {
        let m = mean(&[1000.0, 900.0, 1100.0]).unwrap();
        assert!((m - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn pct_of_zero_reference_is_infinite() {
        assert!(pct_of(1.0, 0.0).is_infinite());
        assert!((pct_of(0.2, 100.0) - 0.2).abs() < 1e-12);
    }
}
