//! Columnar input table for hourly demand observations.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TIMESTAMP: &str = "timestamp";
pub const ZONE_ID: &str = "zone_id";
pub const SEGMENT_ID: &str = "segment_id";
pub const FINAL_DEMAND: &str = "final_demand";
pub const ORDERS_COMPLETED: &str = "orders_completed";
pub const ORDERS_LOST_CAPACITY: &str = "orders_lost_capacity";

/// Columns every demand table must carry.
///
/// The two order columns are not used by forecasting but are part of the
/// upstream contract and are checked like the others.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    TIMESTAMP,
    ZONE_ID,
    SEGMENT_ID,
    FINAL_DEMAND,
    ORDERS_COMPLETED,
    ORDERS_LOST_CAPACITY,
];

/// A single typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<String>),
    Float(Vec<f64>),
    Timestamp(Vec<DateTime<Utc>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One row of the upstream orders fact table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub timestamp: DateTime<Utc>,
    pub zone_id: String,
    pub segment_id: String,
    pub final_demand: f64,
    pub orders_completed: f64,
    pub orders_lost_capacity: f64,
}

/// Named, equal-length columns.
#[derive(Debug, Clone, Default)]
pub struct DemandFrame {
    columns: BTreeMap<String, Column>,
    n_rows: Option<usize>,
}

impl DemandFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame holding every required column from row records.
    pub fn from_records(records: &[DemandRecord]) -> Self {
        let mut columns = BTreeMap::new();
        columns.insert(
            TIMESTAMP.to_string(),
            Column::Timestamp(records.iter().map(|r| r.timestamp).collect()),
        );
        columns.insert(
            ZONE_ID.to_string(),
            Column::Text(records.iter().map(|r| r.zone_id.clone()).collect()),
        );
        columns.insert(
            SEGMENT_ID.to_string(),
            Column::Text(records.iter().map(|r| r.segment_id.clone()).collect()),
        );
        columns.insert(
            FINAL_DEMAND.to_string(),
            Column::Float(records.iter().map(|r| r.final_demand).collect()),
        );
        columns.insert(
            ORDERS_COMPLETED.to_string(),
            Column::Float(records.iter().map(|r| r.orders_completed).collect()),
        );
        columns.insert(
            ORDERS_LOST_CAPACITY.to_string(),
            Column::Float(records.iter().map(|r| r.orders_lost_capacity).collect()),
        );
        Self {
            columns,
            n_rows: Some(records.len()),
        }
    }

    /// Add or replace a column. All columns must share one length.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        let others_len = self
            .columns
            .iter()
            .find(|(existing, _)| **existing != name)
            .map(|(_, c)| c.len());
        if let Some(expected) = others_len {
            if column.len() != expected {
                return Err(ForecastError::DimensionMismatch {
                    expected,
                    got: column.len(),
                });
            }
        }
        self.n_rows = Some(column.len());
        self.columns.insert(name, column);
        Ok(self)
    }

    /// Drop a column if present.
    pub fn without_column(mut self, name: &str) -> Self {
        self.columns.remove(name);
        if self.columns.is_empty() {
            self.n_rows = None;
        }
        self
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows.unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Fail with `MissingColumn` for the first absent required column.
    pub fn require_columns(&self) -> Result<()> {
        for name in REQUIRED_COLUMNS {
            if !self.columns.contains_key(name) {
                return Err(ForecastError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }

    fn required(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
    }

    pub fn text(&self, name: &str) -> Result<&[String]> {
        match self.required(name)? {
            Column::Text(v) => Ok(v),
            _ => Err(ForecastError::ColumnType {
                column: name.to_string(),
                expected: "text",
            }),
        }
    }

    pub fn float(&self, name: &str) -> Result<&[f64]> {
        match self.required(name)? {
            Column::Float(v) => Ok(v),
            _ => Err(ForecastError::ColumnType {
                column: name.to_string(),
                expected: "float",
            }),
        }
    }

    /// Timestamps from either a typed column or ISO-8601 text.
    pub fn timestamps(&self, name: &str) -> Result<Vec<DateTime<Utc>>> {
        match self.required(name)? {
            Column::Timestamp(v) => Ok(v.clone()),
            Column::Text(v) => v.iter().map(|s| parse_timestamp(s)).collect(),
            Column::Float(_) => Err(ForecastError::ColumnType {
                column: name.to_string(),
                expected: "timestamp",
            }),
        }
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO-8601 timestamp. Naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(ForecastError::TimestampError(format!(
        "cannot parse '{raw}' as an ISO-8601 timestamp"
    )))
}
