//! Statistical utility functions.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (n denominator).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Quantile by linear interpolation between closest ranks.
///
/// For sorted values `x` of length n the result at probability `q` is
/// `x[i] + (x[i+1] - x[i]) * f` where `i + f = q * (n - 1)`. This is the
/// "type 7" estimator used by R and numpy by default.
///
/// # Example
/// ```
/// use demand_forecast::utils::stats::quantile;
///
/// let q = quantile(&[4.0, 1.0, 3.0, 2.0, 5.0], 0.1);
/// assert!((q - 1.4).abs() < 1e-12);
/// ```
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    quantile_sorted(&sorted, q)
}

/// Same as [`quantile`] for input that is already sorted ascending.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Approximate equality with a relative and an absolute tolerance.
///
/// `|a - b| <= 1e-8 + 1e-5 * |b|`, the numpy `isclose` defaults.
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}

/// Mean of the last `window` values (all values if shorter).
pub fn tail_mean(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    mean(&values[start..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn population_std_dev_uses_n_denominator() {
        // Population variance of [2, 4, 4, 4, 5, 5, 7, 9] is 4
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(population_std_dev(&values), 2.0, epsilon = 1e-12);
        assert_eq!(population_std_dev(&[3.0, 3.0, 3.0]), 0.0);
        assert!(population_std_dev(&[]).is_nan());
    }

    #[test]
    fn quantile_interpolates_between_ranks() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile(&values, 0.0), 1.0);
        assert_relative_eq!(quantile(&values, 1.0), 4.0);
        assert_relative_eq!(quantile(&values, 0.5), 2.5);
        // position 0.9 * 3 = 2.7
        assert_relative_eq!(quantile(&values, 0.9), 3.7, epsilon = 1e-12);
    }

    #[test]
    fn quantile_ignores_input_order() {
        assert_relative_eq!(
            quantile(&[5.0, 1.0, 4.0, 2.0, 3.0], 0.25),
            2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn quantile_single_value_and_empty() {
        assert_eq!(quantile(&[7.0], 0.1), 7.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn is_close_matches_tolerances() {
        assert!(is_close(1.0, 1.0 + 1e-9));
        assert!(is_close(1e6, 1e6 + 5.0));
        assert!(!is_close(1.0, 1.001));
        assert!(is_close(0.0, 1e-9));
    }

    #[test]
    fn tail_mean_uses_window_or_everything() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(tail_mean(&values, 2), 3.5);
        assert_relative_eq!(tail_mean(&values, 10), 2.5);
    }
}
