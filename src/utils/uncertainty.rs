//! Residual-quantile uncertainty bands.
//!
//! Bands are estimated once per series and model from a held-out tail and
//! then applied as flat additive offsets to every forecast step, so their
//! width does not grow with the horizon.

use crate::error::{ForecastError, Result};
use crate::utils::stats::{is_close, population_std_dev, quantile_sorted};

/// Additive offsets around a point forecast.
///
/// `low <= 0 <= high` is not guaranteed: a biased forecaster can leave both
/// residual quantiles on the same side of zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyBand {
    pub low: f64,
    pub high: f64,
}

impl UncertaintyBand {
    /// Band used when there are no residuals to learn from.
    pub const FALLBACK: UncertaintyBand = UncertaintyBand {
        low: -1.0,
        high: 1.0,
    };

    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn symmetric(spread: f64) -> Self {
        Self {
            low: -spread,
            high: spread,
        }
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Lower bound for a point forecast, floored at zero.
    pub fn lower(&self, point: f64) -> f64 {
        (point + self.low).max(0.0)
    }

    /// Upper bound for a point forecast, floored at zero.
    pub fn upper(&self, point: f64) -> f64 {
        (point + self.high).max(0.0)
    }
}

/// Turns out-of-sample residuals into an [`UncertaintyBand`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyEstimator {
    /// Residual quantile used for the low offset.
    pub low_quantile: f64,
    /// Residual quantile used for the high offset.
    pub high_quantile: f64,
}

impl Default for UncertaintyEstimator {
    fn default() -> Self {
        Self {
            low_quantile: 0.10,
            high_quantile: 0.90,
        }
    }
}

impl UncertaintyEstimator {
    pub fn new(low_quantile: f64, high_quantile: f64) -> Self {
        Self {
            low_quantile,
            high_quantile,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |q: f64| (0.0..=1.0).contains(&q);
        if !in_range(self.low_quantile) || !in_range(self.high_quantile) {
            return Err(ForecastError::InvalidParameter(
                "uncertainty quantiles must lie in [0, 1]".into(),
            ));
        }
        if self.low_quantile >= self.high_quantile {
            return Err(ForecastError::InvalidParameter(format!(
                "low quantile {} must be below high quantile {}",
                self.low_quantile, self.high_quantile
            )));
        }
        Ok(())
    }

    /// Estimate a band from matching actual and forecast values.
    ///
    /// Returns [`UncertaintyBand::FALLBACK`] when either input is empty. When
    /// the two residual quantiles coincide the band falls back to plus or
    /// minus the residual standard deviation, or 1.0 if that is zero (within
    /// 1e-8). The tolerance lets an exact fit whose residuals are only
    /// round-off get the unit band; a genuine spread below 1e-8 is widened to
    /// 1.0 as well.
    pub fn estimate(&self, actuals: &[f64], forecasts: &[f64]) -> Result<UncertaintyBand> {
        if actuals.is_empty() || forecasts.is_empty() {
            return Ok(UncertaintyBand::FALLBACK);
        }
        if actuals.len() != forecasts.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: actuals.len(),
                got: forecasts.len(),
            });
        }

        let mut residuals: Vec<f64> = actuals
            .iter()
            .zip(forecasts.iter())
            .map(|(a, f)| a - f)
            .collect();
        let spread = population_std_dev(&residuals);

        residuals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let low = quantile_sorted(&residuals, self.low_quantile);
        let high = quantile_sorted(&residuals, self.high_quantile);

        if is_close(low, high) {
            // Round-off residuals from an exact fit count as zero spread.
            let spread = if is_close(spread, 0.0) { 1.0 } else { spread };
            return Ok(UncertaintyBand::symmetric(spread));
        }

        Ok(UncertaintyBand::new(low, high))
    }
}

/// Estimate a band with the default 10th/90th percentile estimator.
pub fn estimate_uncertainty(actuals: &[f64], forecasts: &[f64]) -> Result<UncertaintyBand> {
    UncertaintyEstimator::default().estimate(actuals, forecasts)
}

/// Size of the held-out tail used to measure out-of-sample residuals.
///
/// `min(max_hours, max(min_hours, n / divisor))` with integer division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldoutRule {
    pub min_hours: usize,
    pub max_hours: usize,
    pub divisor: usize,
}

impl Default for HoldoutRule {
    fn default() -> Self {
        Self {
            min_hours: 24,
            max_hours: 72,
            divisor: 10,
        }
    }
}

impl HoldoutRule {
    pub fn validate(&self) -> Result<()> {
        if self.divisor == 0 {
            return Err(ForecastError::InvalidParameter(
                "holdout divisor must be positive".into(),
            ));
        }
        if self.min_hours == 0 || self.min_hours > self.max_hours {
            return Err(ForecastError::InvalidParameter(format!(
                "holdout bounds must satisfy 0 < min ({}) <= max ({})",
                self.min_hours, self.max_hours
            )));
        }
        Ok(())
    }

    /// Holdout length for a series of `n` observations.
    pub fn holdout(&self, n: usize) -> usize {
        (n / self.divisor.max(1)).max(self.min_hours).min(self.max_hours)
    }

    /// Index splitting train prefix from holdout tail, or `None` when the
    /// train prefix would be empty.
    pub fn split(&self, n: usize) -> Option<usize> {
        let holdout = self.holdout(n);
        (n > holdout).then(|| n - holdout)
    }
}
