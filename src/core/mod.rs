//! Core data structures: the input frame, per-series views and forecast output.

mod forecast;
mod frame;
mod series;

pub use forecast::{ForecastRow, ForecastTable, ModelKind, OUTPUT_COLUMNS};
pub use frame::{
    parse_timestamp, Column, DemandFrame, DemandRecord, FINAL_DEMAND, ORDERS_COMPLETED,
    ORDERS_LOST_CAPACITY, REQUIRED_COLUMNS, SEGMENT_ID, TIMESTAMP, ZONE_ID,
};
pub use series::{partition_series, ObservedSeries, SeriesKey};
