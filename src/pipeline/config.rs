//! Run configuration for the forecasting pipeline.

use crate::error::{ForecastError, Result};
use crate::models::BaselineConfig;
use crate::utils::uncertainty::{HoldoutRule, UncertaintyEstimator};

/// Everything a forecasting run can be tuned by.
///
/// Passed to [`ForecastOrchestrator`](crate::pipeline::ForecastOrchestrator)
/// at construction; two orchestrators with different configs never share
/// state.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Hours in the immediate-horizon projection.
    pub short_horizon: usize,
    /// Hours in the planning-horizon projection (the emitted table).
    pub long_horizon: usize,
    /// Holdout sizing for out-of-sample residuals.
    pub holdout: HoldoutRule,
    /// Baseline model tunables.
    pub baseline: BaselineConfig,
    /// Residual quantiles for uncertainty bands.
    pub uncertainty: UncertaintyEstimator,
    /// Hours averaged into each series' recent actual demand.
    pub recent_window: usize,
    /// Train and project series on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            short_horizon: 24,
            long_horizon: 72,
            holdout: HoldoutRule::default(),
            baseline: BaselineConfig::default(),
            uncertainty: UncertaintyEstimator::default(),
            recent_window: 72,
            parallel: true,
        }
    }
}

impl ForecastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the short and long projection horizons.
    pub fn with_horizons(mut self, short_horizon: usize, long_horizon: usize) -> Self {
        self.short_horizon = short_horizon;
        self.long_horizon = long_horizon;
        self
    }

    pub fn with_holdout(mut self, holdout: HoldoutRule) -> Self {
        self.holdout = holdout;
        self
    }

    pub fn with_baseline(mut self, baseline: BaselineConfig) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_uncertainty(mut self, uncertainty: UncertaintyEstimator) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    pub fn with_recent_window(mut self, hours: usize) -> Self {
        self.recent_window = hours;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.short_horizon == 0 || self.long_horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast horizons must be positive".into(),
            ));
        }
        if self.short_horizon > self.long_horizon {
            return Err(ForecastError::InvalidParameter(format!(
                "short horizon ({}) exceeds long horizon ({})",
                self.short_horizon, self.long_horizon
            )));
        }
        if self.recent_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "recent window must be positive".into(),
            ));
        }
        self.holdout.validate()?;
        self.baseline.validate()?;
        self.uncertainty.validate()
    }
}
