//! Seasonal-profile baseline with a damped trend.
//!
//! The forecast is a recent demand level scaled by multiplicative
//! hour-of-day and day-of-week profiles, times a trend ratio raised to a
//! fractional power of the step so the full ratio only applies after a day.

use crate::core::{ModelKind, ObservedSeries};
use crate::error::{ForecastError, Result};
use crate::models::{Forecaster, PointForecaster};
use crate::utils::stats::mean;
use chrono::{DateTime, Datelike, Timelike, Utc};
use tracing::debug;

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;

/// Tunables for [`BaselineForecaster`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineConfig {
    /// Hours in the recent and prior trend windows.
    pub window: usize,
    /// Lower clamp for the trend ratio.
    pub min_trend: f64,
    /// Upper clamp for the trend ratio.
    pub max_trend: f64,
    /// Floor applied to means used as divisors or levels.
    pub level_floor: f64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            window: 168,
            min_trend: 0.90,
            max_trend: 1.10,
            level_floor: 1e-6,
        }
    }
}

impl BaselineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(ForecastError::InvalidParameter(
                "baseline window must be positive".into(),
            ));
        }
        if !(self.min_trend > 0.0 && self.min_trend <= self.max_trend) {
            return Err(ForecastError::InvalidParameter(format!(
                "trend bounds must satisfy 0 < min ({}) <= max ({})",
                self.min_trend, self.max_trend
            )));
        }
        if !(self.level_floor > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "level floor must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Fits [`BaselineModel`]s.
#[derive(Debug, Clone, Default)]
pub struct BaselineForecaster {
    config: BaselineConfig,
}

impl BaselineForecaster {
    pub fn new(config: BaselineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }
}

/// Fitted seasonal baseline for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineModel {
    level: f64,
    hour_profile: [f64; HOURS_PER_DAY],
    dow_profile: [f64; DAYS_PER_WEEK],
    trend_ratio: f64,
    last_timestamp: DateTime<Utc>,
}

impl BaselineModel {
    /// Assemble a model from known components.
    pub fn from_components(
        level: f64,
        hour_profile: [f64; HOURS_PER_DAY],
        dow_profile: [f64; DAYS_PER_WEEK],
        trend_ratio: f64,
        last_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            level,
            hour_profile,
            dow_profile,
            trend_ratio,
            last_timestamp,
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn hour_profile(&self) -> &[f64; HOURS_PER_DAY] {
        &self.hour_profile
    }

    pub fn dow_profile(&self) -> &[f64; DAYS_PER_WEEK] {
        &self.dow_profile
    }

    pub fn trend_ratio(&self) -> f64 {
        self.trend_ratio
    }

    /// Point forecast for `timestamp`, `step` hours after the last observation.
    pub fn predict_at(&self, timestamp: DateTime<Utc>, step: usize) -> f64 {
        let hour_effect = self.hour_profile[timestamp.hour() as usize];
        let dow_effect = self.dow_profile[timestamp.weekday().num_days_from_monday() as usize];
        let trend_effect = self.trend_ratio.powf(step as f64 / HOURS_PER_DAY as f64);
        (self.level * hour_effect * dow_effect * trend_effect).max(0.0)
    }
}

impl PointForecaster for BaselineModel {
    fn last_timestamp(&self) -> DateTime<Utc> {
        self.last_timestamp
    }

    fn predict(&self, horizon: usize) -> Vec<f64> {
        self.future_timestamps(horizon)
            .into_iter()
            .enumerate()
            .map(|(i, ts)| self.predict_at(ts, i + 1))
            .collect()
    }
}

/// Mean per stratum divided by `overall`, 1.0 for strata with no rows.
fn profile<const N: usize>(values: &[f64], strata: &[usize], overall: f64) -> [f64; N] {
    let mut sums = [0.0; N];
    let mut counts = [0usize; N];
    for (&value, &stratum) in values.iter().zip(strata.iter()) {
        sums[stratum] += value;
        counts[stratum] += 1;
    }

    let mut out = [1.0; N];
    for i in 0..N {
        if counts[i] > 0 {
            out[i] = sums[i] / counts[i] as f64 / overall;
        }
    }
    out
}

impl Forecaster for BaselineForecaster {
    type Model = BaselineModel;

    fn kind(&self) -> ModelKind {
        ModelKind::Baseline
    }

    fn fit(&self, series: &ObservedSeries) -> Result<BaselineModel> {
        let last_timestamp = series.last_timestamp().ok_or(ForecastError::EmptyData)?;
        let values = series.demand();
        let n = values.len();
        let window = self.config.window;
        let floor = self.config.level_floor;

        let overall = mean(values).max(floor);
        let hour_profile = profile::<HOURS_PER_DAY>(values, series.hours(), overall);
        let dow_profile = profile::<DAYS_PER_WEEK>(values, series.weekdays(), overall);

        let recent = if n >= window { &values[n - window..] } else { values };
        let prior = if n >= 2 * window {
            &values[n - 2 * window..n - window]
        } else {
            values
        };

        let level = mean(recent).max(floor);
        let prior_level = mean(prior).max(floor);
        let trend_ratio = (level / prior_level).clamp(self.config.min_trend, self.config.max_trend);

        debug!(
            series = %series.key(),
            observations = n,
            level,
            trend_ratio,
            "fitted baseline"
        );

        Ok(BaselineModel {
            level,
            hour_profile,
            dow_profile,
            trend_ratio,
            last_timestamp,
        })
    }
}
