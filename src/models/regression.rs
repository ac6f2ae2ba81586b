//! Linear lag + calendar regression, forecast recursively.
//!
//! Each target hour is regressed on a bias, demand 1h, 24h and 168h
//! earlier, and one-hot hour-of-day and day-of-week indicators with hour 0
//! and Monday as the omitted reference categories.

use crate::core::{ModelKind, ObservedSeries};
use crate::error::{ForecastError, Result};
use crate::models::{Forecaster, PointForecaster};
use crate::utils::ols::{dot, least_squares};
use chrono::{DateTime, Datelike, Timelike, Utc};
use tracing::debug;

/// Lag offsets in hours, in feature order.
pub const LAGS: [usize; 3] = [1, 24, 168];

/// Longest lag; the first `MAX_LAG` hours of a series produce no rows.
pub const MAX_LAG: usize = 168;

/// bias + lags + 23 hour indicators + 6 weekday indicators
pub const NUM_FEATURES: usize = 1 + LAGS.len() + 23 + 6;

pub type FeatureRow = [f64; NUM_FEATURES];

const HOUR_OFFSET: usize = 1 + LAGS.len();
const DOW_OFFSET: usize = HOUR_OFFSET + 23;

/// Build one feature row.
///
/// `lags` holds demand at [`LAGS`] hours before the target, `hour` is 0..24
/// and `weekday` counts from Monday = 0.
pub fn feature_row(lags: [f64; 3], hour: usize, weekday: usize) -> FeatureRow {
    let mut row = [0.0; NUM_FEATURES];
    row[0] = 1.0;
    row[1..HOUR_OFFSET].copy_from_slice(&lags);
    if hour > 0 {
        row[HOUR_OFFSET + hour - 1] = 1.0;
    }
    if weekday > 0 {
        row[DOW_OFFSET + weekday - 1] = 1.0;
    }
    row
}

/// Training rows and targets for one series.
#[derive(Debug, Clone, Default)]
pub struct RegressionDesign {
    pub rows: Vec<FeatureRow>,
    pub targets: Vec<f64>,
    pub timestamps: Vec<DateTime<Utc>>,
}

impl RegressionDesign {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row per observation that has a full 168 hours of history behind it.
pub fn build_design(series: &ObservedSeries) -> RegressionDesign {
    let y = series.demand();
    let n = y.len();
    let rows_len = n.saturating_sub(MAX_LAG);

    let mut design = RegressionDesign {
        rows: Vec::with_capacity(rows_len),
        targets: Vec::with_capacity(rows_len),
        timestamps: Vec::with_capacity(rows_len),
    };
    for t in MAX_LAG..n {
        let lags = LAGS.map(|lag| y[t - lag]);
        design
            .rows
            .push(feature_row(lags, series.hours()[t], series.weekdays()[t]));
        design.targets.push(y[t]);
        design.timestamps.push(series.timestamps()[t]);
    }
    design
}

/// Fixed-capacity ring buffer over the most recent [`MAX_LAG`] values.
///
/// Recursive forecasts push each prediction here, so lags that reach into
/// the forecast read predictions and older lags still read observations.
#[derive(Debug, Clone)]
pub struct LagWindow {
    values: [f64; MAX_LAG],
    next: usize,
}

impl LagWindow {
    /// Seed from the last [`MAX_LAG`] values of `history`.
    pub fn seeded(history: &[f64]) -> Result<Self> {
        if history.len() < MAX_LAG {
            return Err(ForecastError::InsufficientData {
                needed: MAX_LAG,
                got: history.len(),
            });
        }
        let mut values = [0.0; MAX_LAG];
        values.copy_from_slice(&history[history.len() - MAX_LAG..]);
        Ok(Self { values, next: 0 })
    }

    /// Value pushed `lag` steps ago, `1 <= lag <= MAX_LAG`.
    pub fn lag(&self, lag: usize) -> f64 {
        debug_assert!((1..=MAX_LAG).contains(&lag), "lag {lag} out of range");
        self.values[(self.next + MAX_LAG - lag) % MAX_LAG]
    }

    pub fn push(&mut self, value: f64) {
        self.values[self.next] = value;
        self.next = (self.next + 1) % MAX_LAG;
    }
}

/// Fits [`RegressionModel`]s by ordinary least squares.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionForecaster;

impl RegressionForecaster {
    pub fn new() -> Self {
        Self
    }
}

/// Fitted lag regression for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionModel {
    coefficients: Vec<f64>,
    history: Vec<f64>,
    last_timestamp: DateTime<Utc>,
}

impl RegressionModel {
    /// Assemble a model from known coefficients and observed history.
    pub fn from_coefficients(
        coefficients: Vec<f64>,
        history: Vec<f64>,
        last_timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        if coefficients.len() != NUM_FEATURES {
            return Err(ForecastError::DimensionMismatch {
                expected: NUM_FEATURES,
                got: coefficients.len(),
            });
        }
        if history.len() < MAX_LAG {
            return Err(ForecastError::InsufficientData {
                needed: MAX_LAG,
                got: history.len(),
            });
        }
        Ok(Self {
            coefficients,
            history,
            last_timestamp,
        })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

impl PointForecaster for RegressionModel {
    fn last_timestamp(&self) -> DateTime<Utc> {
        self.last_timestamp
    }

    fn predict(&self, horizon: usize) -> Vec<f64> {
        // A fitted model always holds more than MAX_LAG observations.
        let Ok(mut window) = LagWindow::seeded(&self.history) else {
            return Vec::new();
        };

        let mut predictions = Vec::with_capacity(horizon);
        for ts in self.future_timestamps(horizon) {
            let lags = LAGS.map(|lag| window.lag(lag));
            let row = feature_row(
                lags,
                ts.hour() as usize,
                ts.weekday().num_days_from_monday() as usize,
            );
            let prediction = dot(&self.coefficients, &row).max(0.0);
            predictions.push(prediction);
            window.push(prediction);
        }
        predictions
    }
}

impl Forecaster for RegressionForecaster {
    type Model = RegressionModel;

    fn kind(&self) -> ModelKind {
        ModelKind::Regression
    }

    fn fit(&self, series: &ObservedSeries) -> Result<RegressionModel> {
        let last_timestamp = series.last_timestamp().ok_or(ForecastError::EmptyData)?;
        let design = build_design(series);
        if design.is_empty() {
            return Err(ForecastError::InsufficientData {
                needed: MAX_LAG + 1,
                got: series.len(),
            });
        }

        let fit = least_squares(&design.rows, &design.targets)?;
        debug!(
            series = %series.key(),
            rows = design.len(),
            rank = fit.rank,
            "fitted regression"
        );

        Ok(RegressionModel {
            coefficients: fit.coefficients,
            history: series.demand().to_vec(),
            last_timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SeriesKey;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn make_series(values: Vec<f64>) -> ObservedSeries {
        let timestamps = (0..values.len())
            .map(|i| start() + Duration::hours(i as i64))
            .collect();
        ObservedSeries::new(SeriesKey::new("zone_1", "value"), timestamps, values).unwrap()
    }

    #[test]
    fn feature_row_layout() {
        let row = feature_row([3.0, 2.0, 1.0], 0, 0);
        assert_eq!(row.len(), 33);
        assert_eq!(&row[..4], &[1.0, 3.0, 2.0, 1.0]);
        assert!(row[4..].iter().all(|&x| x == 0.0));

        let row = feature_row([0.0; 3], 23, 6);
        assert_eq!(row[HOUR_OFFSET + 22], 1.0);
        assert_eq!(row[DOW_OFFSET + 5], 1.0);
        assert_eq!(row.iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn design_needs_a_full_week_of_history() {
        assert!(build_design(&make_series(vec![1.0; 168])).is_empty());

        let values: Vec<f64> = (0..169).map(|i| i as f64).collect();
        let design = build_design(&make_series(values));
        assert_eq!(design.len(), 1);
        assert_eq!(design.targets, vec![168.0]);
        // lag 1, 24, 168 of index 168
        assert_eq!(&design.rows[0][1..4], &[167.0, 144.0, 0.0]);
        assert_eq!(design.timestamps[0], start() + Duration::hours(168));
    }

    #[test]
    fn fit_rejects_series_without_design_rows() {
        let err = RegressionForecaster.fit(&make_series(vec![5.0; 168])).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientData {
                needed: 169,
                got: 168
            }
        );
        assert!(RegressionForecaster.fit(&make_series(vec![5.0; 169])).is_ok());
    }

    #[test]
    fn lag_window_reads_back_history_in_order() {
        let history: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let mut window = LagWindow::seeded(&history).unwrap();
        assert_eq!(window.lag(1), 199.0);
        assert_eq!(window.lag(24), 176.0);
        assert_eq!(window.lag(168), 32.0);

        window.push(-1.0);
        assert_eq!(window.lag(1), -1.0);
        assert_eq!(window.lag(2), 199.0);
        assert_eq!(window.lag(168), 33.0);
    }

    #[test]
    fn lag_window_requires_full_history() {
        assert!(matches!(
            LagWindow::seeded(&[1.0; 10]),
            Err(ForecastError::InsufficientData { needed: 168, got: 10 })
        ));
    }

    #[test]
    fn constant_series_forecasts_its_level() {
        let model = RegressionForecaster.fit(&make_series(vec![50.0; 400])).unwrap();
        for value in model.predict(72) {
            assert_relative_eq!(value, 50.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn recursive_forecast_feeds_predictions_back_as_lag_one() {
        let mut coefficients = vec![0.0; NUM_FEATURES];
        coefficients[0] = 10.0;
        coefficients[1] = 0.5;
        let mut history = vec![20.0; 200];
        history[199] = 40.0;
        let model = RegressionModel::from_coefficients(coefficients, history, start()).unwrap();

        let preds = model.predict(4);
        assert_eq!(preds, vec![30.0, 25.0, 22.5, 21.25]);
    }

    #[test]
    fn lag_24_reads_history_then_forecasts() {
        let mut coefficients = vec![0.0; NUM_FEATURES];
        coefficients[2] = 1.0;
        let history: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let model = RegressionModel::from_coefficients(coefficients, history, start()).unwrap();

        let preds = model.predict(48);
        // First day repeats the last observed day, second day repeats the first.
        assert_eq!(preds[0], 176.0);
        assert_eq!(preds[23], 199.0);
        assert_eq!(&preds[24..], &preds[..24]);
    }

    #[test]
    fn from_coefficients_checks_shapes() {
        assert!(matches!(
            RegressionModel::from_coefficients(vec![0.0; 4], vec![0.0; 200], start()),
            Err(ForecastError::DimensionMismatch { expected: 33, got: 4 })
        ));
        assert!(matches!(
            RegressionModel::from_coefficients(vec![0.0; NUM_FEATURES], vec![0.0; 10], start()),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn hand_computed_calendar_effects_are_recovered() {
        // Flat lags, demand 10 at hour 0, 10 + h elsewhere, +2 on Sundays.
        let values: Vec<f64> = (0..24 * 7 * 4)
            .map(|i| {
                let hour = i % 24;
                let weekday = (i / 24) % 7;
                10.0 + hour as f64 + if weekday == 6 { 2.0 } else { 0.0 }
            })
            .collect();
        let series = make_series(values);
        let design = build_design(&series);
        let fit = least_squares(&design.rows, &design.targets).unwrap();

        // Every fitted value reproduces its target.
        for (row, target) in design.rows.iter().zip(design.targets.iter()) {
            assert_relative_eq!(dot(&fit.coefficients, row), *target, epsilon = 1e-6);
        }

        let model = RegressionForecaster.fit(&series).unwrap();
        let preds = model.predict(24);
        // The series ends Sunday 23:00, so the forecast covers Monday.
        for (hour, value) in preds.iter().enumerate() {
            assert_relative_eq!(*value, 10.0 + hour as f64, epsilon = 1e-6);
        }
    }

    #[test]
    fn predictions_are_floored_at_zero() {
        // Falling series whose linear continuation goes negative.
        let values: Vec<f64> = (0..300).map(|i| (300 - i) as f64 * 0.1).collect();
        let model = RegressionForecaster.fit(&make_series(values)).unwrap();
        assert!(model.predict(72).iter().all(|&v| v >= 0.0));
    }
}
