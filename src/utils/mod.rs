//! Numerical helpers shared by the forecasters.

pub mod ols;
pub mod stats;
pub mod uncertainty;

pub use ols::{least_squares, LeastSquaresFit};
pub use uncertainty::{estimate_uncertainty, HoldoutRule, UncertaintyBand, UncertaintyEstimator};
