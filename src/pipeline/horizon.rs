//! Turns fitted series into forecast rows for a horizon.

use crate::core::ForecastRow;
use crate::models::{FittedSeries, PointForecaster};
use rayon::prelude::*;

/// Projects fitted series forward and attaches their uncertainty bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizonProjector {
    parallel: bool,
}

impl HorizonProjector {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// One row per hour in `1..=horizon` after the series' last observation.
    ///
    /// Bounds are the point forecast plus the frozen band offsets, floored
    /// at zero.
    pub fn project(&self, fitted: &FittedSeries, horizon: usize) -> Vec<ForecastRow> {
        let kind = fitted.kind();
        let points = fitted.model.predict(horizon);
        fitted
            .model
            .future_timestamps(horizon)
            .into_iter()
            .zip(points)
            .map(|(timestamp, point)| ForecastRow {
                timestamp,
                zone_id: fitted.key.zone_id.clone(),
                segment_id: fitted.key.segment_id.clone(),
                forecast_model: kind,
                forecast_demand: point,
                lower_bound: fitted.band.lower(point),
                upper_bound: fitted.band.upper(point),
            })
            .collect()
    }

    /// Rows for every series, grouped by series in input order.
    pub fn project_all(&self, fitted: &[FittedSeries], horizon: usize) -> Vec<ForecastRow> {
        let per_series: Vec<Vec<ForecastRow>> = if self.parallel {
            fitted
                .par_iter()
                .map(|f| self.project(f, horizon))
                .collect()
        } else {
            fitted.iter().map(|f| self.project(f, horizon)).collect()
        };
        per_series.into_iter().flatten().collect()
    }
}
