//! Per-(zone, segment) hourly demand series and the partitioner that builds them.

use crate::core::frame::{DemandFrame, FINAL_DEMAND, SEGMENT_ID, TIMESTAMP, ZONE_ID};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies one series. Orders by zone, then segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub zone_id: String,
    pub segment_id: String,
}

impl SeriesKey {
    pub fn new(zone_id: impl Into<String>, segment_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            segment_id: segment_id.into(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.zone_id, self.segment_id)
    }
}

/// Hourly demand observations for one key, in timestamp order.
///
/// Timestamps are assumed to lie on a gap-free hourly grid. Nothing here
/// checks that; callers feeding irregular data get calendar features that
/// still match each row, but lag features will be misaligned.
#[derive(Debug, Clone)]
pub struct ObservedSeries {
    key: SeriesKey,
    timestamps: Vec<DateTime<Utc>>,
    demand: Vec<f64>,
    hours: Vec<usize>,
    weekdays: Vec<usize>,
}

impl ObservedSeries {
    /// Create a series and derive its calendar fields.
    pub fn new(key: SeriesKey, timestamps: Vec<DateTime<Utc>>, demand: Vec<f64>) -> Result<Self> {
        if timestamps.len() != demand.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: demand.len(),
            });
        }
        let hours = timestamps.iter().map(|t| t.hour() as usize).collect();
        let weekdays = timestamps
            .iter()
            .map(|t| t.weekday().num_days_from_monday() as usize)
            .collect();
        Ok(Self {
            key,
            timestamps,
            demand,
            hours,
            weekdays,
        })
    }

    pub fn key(&self) -> &SeriesKey {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn demand(&self) -> &[f64] {
        &self.demand
    }

    /// Hour of day (0..24) per observation.
    pub fn hours(&self) -> &[usize] {
        &self.hours
    }

    /// Day of week per observation, Monday = 0.
    pub fn weekdays(&self) -> &[usize] {
        &self.weekdays
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Copy of the first `len` observations.
    pub fn prefix(&self, len: usize) -> ObservedSeries {
        let len = len.min(self.len());
        Self {
            key: self.key.clone(),
            timestamps: self.timestamps[..len].to_vec(),
            demand: self.demand[..len].to_vec(),
            hours: self.hours[..len].to_vec(),
            weekdays: self.weekdays[..len].to_vec(),
        }
    }

    /// Demand values from `start` to the end.
    pub fn tail_demand(&self, start: usize) -> &[f64] {
        &self.demand[start.min(self.len())..]
    }
}

/// Split a demand table into independent series, one per (zone, segment).
///
/// Series come back ordered by key; rows within a series are sorted by
/// timestamp (stable, so duplicate timestamps keep input order).
pub fn partition_series(frame: &DemandFrame) -> Result<Vec<ObservedSeries>> {
    frame.require_columns()?;

    let timestamps = frame.timestamps(TIMESTAMP)?;
    let zones = frame.text(ZONE_ID)?;
    let segments = frame.text(SEGMENT_ID)?;
    let demand = frame.float(FINAL_DEMAND)?;

    let mut groups: BTreeMap<SeriesKey, Vec<usize>> = BTreeMap::new();
    for row in 0..frame.n_rows() {
        groups
            .entry(SeriesKey::new(zones[row].as_str(), segments[row].as_str()))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .map(|(key, mut rows)| {
            rows.sort_by_key(|&row| timestamps[row]);
            let ts = rows.iter().map(|&row| timestamps[row]).collect();
            let values = rows.iter().map(|&row| demand[row]).collect();
            ObservedSeries::new(key, ts, values)
        })
        .collect()
}
