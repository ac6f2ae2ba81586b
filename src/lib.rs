//! # demand-forecast
//!
//! Short-horizon hourly demand forecasting for multi-zone, multi-segment
//! services.
//!
//! Every (zone, segment) series gets two interpretable forecasters: a
//! multiplicative seasonal baseline with a damped trend, and a linear
//! regression on 1h/24h/168h lags plus calendar indicators. Each model's
//! uncertainty band is learned from residuals on a held-out tail, and both
//! are projected 24h and 72h ahead into one sorted forecast table.

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{
        partition_series, DemandFrame, DemandRecord, ForecastRow, ForecastTable, ModelKind,
        ObservedSeries, SeriesKey,
    };
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{
        BaselineForecaster, FittedSeries, Forecaster, PointForecaster, RegressionForecaster,
        SeriesModel,
    };
    pub use crate::pipeline::{ForecastConfig, ForecastOrchestrator, ForecastRun};
    pub use crate::utils::{estimate_uncertainty, UncertaintyBand};
}
