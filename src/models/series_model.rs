//! Tagged per-series model records.

use crate::core::{ModelKind, SeriesKey};
use crate::models::{BaselineModel, PointForecaster, RegressionModel};
use crate::utils::uncertainty::UncertaintyBand;
use chrono::{DateTime, Utc};

/// A fitted model of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesModel {
    Baseline(BaselineModel),
    Regression(RegressionModel),
}

impl SeriesModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            SeriesModel::Baseline(_) => ModelKind::Baseline,
            SeriesModel::Regression(_) => ModelKind::Regression,
        }
    }
}

impl PointForecaster for SeriesModel {
    fn last_timestamp(&self) -> DateTime<Utc> {
        match self {
            SeriesModel::Baseline(m) => m.last_timestamp(),
            SeriesModel::Regression(m) => m.last_timestamp(),
        }
    }

    fn predict(&self, horizon: usize) -> Vec<f64> {
        match self {
            SeriesModel::Baseline(m) => m.predict(horizon),
            SeriesModel::Regression(m) => m.predict(horizon),
        }
    }
}

impl From<BaselineModel> for SeriesModel {
    fn from(model: BaselineModel) -> Self {
        SeriesModel::Baseline(model)
    }
}

impl From<RegressionModel> for SeriesModel {
    fn from(model: RegressionModel) -> Self {
        SeriesModel::Regression(model)
    }
}

/// A full-series model plus the band frozen from its holdout validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedSeries {
    pub key: SeriesKey,
    pub model: SeriesModel,
    pub band: UncertaintyBand,
    /// Mean of the most recent observed demand, for sanity summaries.
    pub recent_actual_avg: f64,
}

impl FittedSeries {
    pub fn kind(&self) -> ModelKind {
        self.model.kind()
    }

    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.model.last_timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::baseline::{DAYS_PER_WEEK, HOURS_PER_DAY};
    use crate::models::regression::NUM_FEATURES;
    use chrono::TimeZone;

    fn last() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn dispatches_on_variant() {
        let baseline: SeriesModel = BaselineModel::from_components(
            7.0,
            [1.0; HOURS_PER_DAY],
            [1.0; DAYS_PER_WEEK],
            1.0,
            last(),
        )
        .into();
        assert_eq!(baseline.kind(), ModelKind::Baseline);
        assert_eq!(baseline.predict(3), vec![7.0, 7.0, 7.0]);

        let mut coefficients = vec![0.0; NUM_FEATURES];
        coefficients[0] = 3.0;
        let regression: SeriesModel =
            RegressionModel::from_coefficients(coefficients, vec![0.0; 168], last())
                .unwrap()
                .into();
        assert_eq!(regression.kind(), ModelKind::Regression);
        assert_eq!(regression.predict(2), vec![3.0, 3.0]);
        assert_eq!(regression.last_timestamp(), last());
    }
}
