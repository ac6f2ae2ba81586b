//! Forecasting models.

mod traits;

pub mod baseline;
pub mod regression;
pub mod series_model;

pub use crate::core::ModelKind;
pub use baseline::{BaselineConfig, BaselineForecaster, BaselineModel};
pub use regression::{RegressionForecaster, RegressionModel};
pub use series_model::{FittedSeries, SeriesModel};
pub use traits::{future_timestamps, Forecaster, PointForecaster};
