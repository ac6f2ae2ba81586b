//! Forecast output rows and the table that collects them.

use crate::core::series::SeriesKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output column order.
pub const OUTPUT_COLUMNS: [&str; 7] = [
    "timestamp",
    "zone_id",
    "segment_id",
    "forecast_model",
    "forecast_demand",
    "lower_bound",
    "upper_bound",
];

/// Which forecaster produced a model or row.
///
/// Variant order matches the lexical order of the serialized names, so
/// sorting by `ModelKind` sorts the `forecast_model` column alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Baseline,
    Regression,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Baseline, ModelKind::Regression];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Baseline => "baseline",
            ModelKind::Regression => "regression",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One forecast hour for one series and model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub timestamp: DateTime<Utc>,
    pub zone_id: String,
    pub segment_id: String,
    pub forecast_model: ModelKind,
    pub forecast_demand: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ForecastRow {
    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(self.zone_id.as_str(), self.segment_id.as_str())
    }

    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// A collection of forecast rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<ForecastRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ForecastRow> {
        self.rows
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = ForecastRow>) {
        self.rows.extend(rows);
    }

    /// Sort by (timestamp, zone_id, segment_id, forecast_model).
    pub fn sort(&mut self) {
        self.rows.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.zone_id.cmp(&b.zone_id))
                .then_with(|| a.segment_id.cmp(&b.segment_id))
                .then_with(|| a.forecast_model.cmp(&b.forecast_model))
        });
    }

    /// Rows produced by one model.
    pub fn for_model(&self, kind: ModelKind) -> impl Iterator<Item = &ForecastRow> {
        self.rows.iter().filter(move |r| r.forecast_model == kind)
    }

    /// Rows for one series and model, in table order.
    pub fn for_series<'a>(
        &'a self,
        key: &'a SeriesKey,
        kind: ModelKind,
    ) -> impl Iterator<Item = &'a ForecastRow> + 'a {
        self.rows.iter().filter(move |r| {
            r.forecast_model == kind && r.zone_id == key.zone_id && r.segment_id == key.segment_id
        })
    }
}

impl IntoIterator for ForecastTable {
    type Item = ForecastRow;
    type IntoIter = std::vec::IntoIter<ForecastRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
