//! End-to-end training and projection across every series.

use crate::core::{partition_series, DemandFrame, ForecastTable, ModelKind, ObservedSeries};
use crate::error::{ForecastError, Result};
use crate::models::{
    BaselineForecaster, FittedSeries, Forecaster, PointForecaster, RegressionForecaster,
};
use crate::pipeline::{ForecastConfig, HorizonProjector, HorizonSummary};
use crate::utils::stats::tail_mean;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Output of one forecasting run.
#[derive(Debug, Clone)]
pub struct ForecastRun {
    /// Full-series baseline models, in series key order.
    pub baseline: Vec<FittedSeries>,
    /// Full-series regression models, in series key order.
    pub regression: Vec<FittedSeries>,
    /// Both models projected over the short horizon, sorted.
    pub short_horizon: ForecastTable,
    /// Both models projected over the long horizon, sorted.
    pub long_horizon: ForecastTable,
    /// One summary per model and horizon.
    pub summaries: Vec<HorizonSummary>,
}

impl ForecastRun {
    /// The table handed to downstream consumers: the long horizon.
    pub fn output(&self) -> &ForecastTable {
        &self.long_horizon
    }

    pub fn into_output(self) -> ForecastTable {
        self.long_horizon
    }

    pub fn models(&self, kind: ModelKind) -> &[FittedSeries] {
        match kind {
            ModelKind::Baseline => &self.baseline,
            ModelKind::Regression => &self.regression,
        }
    }
}

/// Trains both forecasters on every series and projects them forward.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use demand_forecast::core::{DemandFrame, DemandRecord};
/// use demand_forecast::pipeline::{ForecastConfig, ForecastOrchestrator};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let records: Vec<_> = (0..400)
///     .map(|i| DemandRecord {
///         timestamp: start + Duration::hours(i),
///         zone_id: "zone_1".into(),
///         segment_id: "value".into(),
///         final_demand: 50.0,
///         orders_completed: 50.0,
///         orders_lost_capacity: 0.0,
///     })
///     .collect();
///
/// let orchestrator = ForecastOrchestrator::new(ForecastConfig::default()).unwrap();
/// let run = orchestrator.run(&DemandFrame::from_records(&records)).unwrap();
/// assert_eq!(run.output().len(), 2 * 72);
/// ```
#[derive(Debug, Clone)]
pub struct ForecastOrchestrator {
    config: ForecastConfig,
    baseline: BaselineForecaster,
    regression: RegressionForecaster,
}

impl ForecastOrchestrator {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            baseline: BaselineForecaster::new(config.baseline),
            regression: RegressionForecaster::new(),
            config,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Partition `frame` and run every series. Schema errors abort the run.
    pub fn run(&self, frame: &DemandFrame) -> Result<ForecastRun> {
        let series = partition_series(frame)?;
        info!(
            rows = frame.n_rows(),
            series = series.len(),
            "partitioned demand table"
        );
        Ok(self.run_series(&series))
    }

    /// Train, project and summarise already partitioned series.
    pub fn run_series(&self, series: &[ObservedSeries]) -> ForecastRun {
        let baseline = self.train_baseline(series);
        let regression = self.train_regression(series);

        let projector = HorizonProjector::new(self.config.parallel);
        let mut summaries = Vec::with_capacity(4);
        let mut tables = Vec::with_capacity(2);

        for horizon in [self.config.short_horizon, self.config.long_horizon] {
            let mut table = ForecastTable::new();
            for (kind, fitted) in [
                (ModelKind::Baseline, &baseline),
                (ModelKind::Regression, &regression),
            ] {
                let rows = projector.project_all(fitted, horizon);
                let summary = HorizonSummary::compute(kind, horizon, fitted, &rows);
                summary.log();
                summaries.push(summary);
                table.extend(rows);
            }
            table.sort();
            tables.push(table);
        }

        let long_horizon = tables.pop().unwrap_or_default();
        let short_horizon = tables.pop().unwrap_or_default();
        info!(
            rows = long_horizon.len(),
            horizon_hours = self.config.long_horizon,
            "forecast table assembled"
        );

        ForecastRun {
            baseline,
            regression,
            short_horizon,
            long_horizon,
            summaries,
        }
    }

    pub fn train_baseline(&self, series: &[ObservedSeries]) -> Vec<FittedSeries> {
        self.train_all(&self.baseline, series)
    }

    /// Series too short for a regression design are left out.
    pub fn train_regression(&self, series: &[ObservedSeries]) -> Vec<FittedSeries> {
        self.train_all(&self.regression, series)
    }

    /// Validate on the holdout tail, then refit on the whole series.
    ///
    /// The train prefix model is projected over the holdout; its residuals
    /// against the actual tail fix the uncertainty band stored with the
    /// full-series model.
    ///
    /// A series no longer than its holdout (up to 24 hours by default) has no
    /// train prefix and is rejected with `InsufficientData`, so it produces
    /// no rows for either model. Index-from-the-end slicing would instead
    /// train such a series on a wrapped-around prefix; that is not done here.
    pub fn train_series<F: Forecaster>(
        &self,
        forecaster: &F,
        series: &ObservedSeries,
    ) -> Result<FittedSeries> {
        let n = series.len();
        let split = self
            .config
            .holdout
            .split(n)
            .ok_or(ForecastError::InsufficientData {
                needed: self.config.holdout.holdout(n) + 1,
                got: n,
            })?;

        let validation_model = forecaster.fit(&series.prefix(split))?;
        let predicted = validation_model.predict(n - split);
        let band = self
            .config
            .uncertainty
            .estimate(series.tail_demand(split), &predicted)?;

        let model = forecaster.fit(series)?;
        Ok(FittedSeries {
            key: series.key().clone(),
            model: model.into(),
            band,
            recent_actual_avg: tail_mean(series.demand(), self.config.recent_window),
        })
    }

    fn train_all<F: Forecaster>(&self, forecaster: &F, series: &[ObservedSeries]) -> Vec<FittedSeries> {
        let train = |s: &ObservedSeries| match self.train_series(forecaster, s) {
            Ok(fitted) => Some(fitted),
            Err(e) if e.is_insufficient_history() => {
                debug!(series = %s.key(), model = %forecaster.kind(), reason = %e, "series skipped");
                None
            }
            Err(e) => {
                warn!(series = %s.key(), model = %forecaster.kind(), error = %e, "series failed to train");
                None
            }
        };

        let fitted: Vec<FittedSeries> = if self.config.parallel {
            series.par_iter().filter_map(train).collect()
        } else {
            series.iter().filter_map(train).collect()
        };

        debug!(
            model = %forecaster.kind(),
            trained = fitted.len(),
            total = series.len(),
            "training finished"
        );
        fitted
    }
}
