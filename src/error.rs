//! Error types for the demand-forecast library.

use thiserror::Error;

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while preparing data or fitting forecasters.
///
/// Schema errors (`MissingColumn`, `ColumnType`, `TimestampError`) abort a run.
/// Data-sufficiency errors (`EmptyData`, `InsufficientData`) are raised per
/// series and absorbed by the orchestrator, which drops the series from the
/// affected model's output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// A required input column is absent.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// A column exists but holds the wrong kind of values.
    #[error("column '{column}' has wrong type: expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl ForecastError {
    /// Whether this error only reflects a short or empty series.
    ///
    /// These are expected data conditions rather than faults.
    pub fn is_insufficient_history(&self) -> bool {
        matches!(
            self,
            ForecastError::EmptyData | ForecastError::InsufficientData { .. }
        )
    }
}
