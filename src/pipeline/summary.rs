//! Sanity statistics for a projected horizon.

use crate::core::{ForecastRow, ModelKind};
use crate::models::FittedSeries;
use crate::utils::stats::mean;
use tracing::info;

/// Aggregates comparing one model's projection with recent actual demand.
///
/// Averages over an empty set are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonSummary {
    pub model: ModelKind,
    pub horizon: usize,
    pub series_count: usize,
    pub avg_forecast_demand: f64,
    pub avg_recent_actual: f64,
    pub avg_uncertainty_width: f64,
}

impl HorizonSummary {
    /// Summarise `rows` produced from `fitted` at `horizon`.
    pub fn compute(
        model: ModelKind,
        horizon: usize,
        fitted: &[FittedSeries],
        rows: &[ForecastRow],
    ) -> Self {
        let recent: Vec<f64> = fitted.iter().map(|f| f.recent_actual_avg).collect();
        let demand: Vec<f64> = rows.iter().map(|r| r.forecast_demand).collect();
        let widths: Vec<f64> = rows.iter().map(|r| r.width()).collect();

        Self {
            model,
            horizon,
            series_count: fitted.len(),
            avg_forecast_demand: mean(&demand),
            avg_recent_actual: mean(&recent),
            avg_uncertainty_width: mean(&widths),
        }
    }

    /// Emit the summary as a structured `info` event.
    pub fn log(&self) {
        info!(
            model = %self.model,
            horizon_hours = self.horizon,
            series = self.series_count,
            avg_forecast_demand = self.avg_forecast_demand,
            avg_recent_actual = self.avg_recent_actual,
            avg_uncertainty_width = self.avg_uncertainty_width,
            "forecast horizon summary"
        );
    }
}
