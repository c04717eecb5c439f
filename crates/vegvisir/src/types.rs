use nalgebra::{DVector, Point2};
use serde::{Deserialize, Serialize};

/// One residual per sample, in the order of the dataset it was computed against.
pub type ResidualVector = DVector<f64>;

/// A single measurement taken at a known location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Fixed, known position at which the measurement was taken.
    pub location: Point2<f64>,
    /// Measurement magnitude, strictly positive for usable samples.
    pub strength: f64,
}

impl Sample {
    #[must_use]
    pub fn new(x: f64, y: f64, strength: f64) -> Self {
        Self {
            location: Point2::new(x, y),
            strength,
        }
    }
}

/// Outcome of a single nonlinear least squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult<P> {
    pub parameters: P,
    /// Sum of squared residuals, evaluated once more at `parameters`.
    pub sum_squared_residual: f64,
    pub converged: bool,
    /// Number of residual evaluations spent by the solver.
    pub evaluations: usize,
}

/// Best supported model found by [`RansacEstimator`](crate::RansacEstimator).
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusResult<P> {
    /// Model parameters refined on the inlier set.
    pub parameters: P,
    /// Indices into the estimated dataset, in ascending order.
    pub inliers: Vec<usize>,
    /// Sum of squared residuals of `parameters` over the inliers.
    pub total_error: f64,
    pub statistics: TrialStatistics,
}

/// How the trials of a RANSAC run ended.
///
/// The counts always add up to the number of configured iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialStatistics {
    /// Trials that reached the inlier fraction and were refined successfully.
    pub accepted: usize,
    /// Trials whose consensus set was too small.
    pub rejected: usize,
    /// Trials in which the minimal fit or the refit did not converge.
    pub diverged: usize,
}

impl TrialStatistics {
    #[must_use]
    pub fn total(&self) -> usize {
        self.accepted + self.rejected + self.diverged
    }
}
