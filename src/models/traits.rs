//! Forecaster traits shared by the baseline and regression models.

use crate::core::{ModelKind, ObservedSeries};
use crate::error::Result;
use crate::models::SeriesModel;
use chrono::{DateTime, Duration, Utc};

/// Fits a per-series model.
///
/// Forecasters are stateless configuration holders; every call to `fit`
/// builds a fresh model, so one forecaster can be shared across threads.
pub trait Forecaster: Send + Sync {
    /// Model produced by a successful fit.
    type Model: PointForecaster + Into<SeriesModel>;

    /// Which output label this forecaster's rows carry.
    fn kind(&self) -> ModelKind;

    /// Fit a model to the whole of `series`.
    fn fit(&self, series: &ObservedSeries) -> Result<Self::Model>;
}

/// A fitted model that can project point forecasts past its history.
pub trait PointForecaster {
    /// Last observed timestamp; step 1 is one hour after it.
    fn last_timestamp(&self) -> DateTime<Utc>;

    /// Point forecasts for steps `1..=horizon`, each floored at zero.
    fn predict(&self, horizon: usize) -> Vec<f64>;

    /// Hourly timestamps for steps `1..=horizon`.
    fn future_timestamps(&self, horizon: usize) -> Vec<DateTime<Utc>> {
        future_timestamps(self.last_timestamp(), horizon)
    }
}

/// Hourly timestamps following `last`.
pub fn future_timestamps(last: DateTime<Utc>, horizon: usize) -> Vec<DateTime<Utc>> {
    (1..=horizon)
        .map(|step| last + Duration::hours(step as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn future_timestamps_start_one_hour_later() {
        let last = Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap();
        let ts = future_timestamps(last, 3);
        assert_eq!(
            ts,
            vec![
                Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 1, 2, 2, 0, 0).unwrap(),
            ]
        );
        assert!(future_timestamps(last, 0).is_empty());
    }
}
