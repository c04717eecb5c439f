pub mod signal;

use crate::{FitResult, ResidualVector, Result};

/// A model that can be fitted to data and scored against it.
///
/// This is the contract [`RansacEstimator`](crate::RansacEstimator) relies on: it fits
/// candidates on minimal subsets, scores them on the full dataset through
/// [`Model::residuals`] and refines accepted candidates on their inliers.
pub trait Model {
    /// Smallest number of data points that determines the parameters.
    const MIN_SAMPLES: usize;

    type Data;
    type Parameters: Clone;

    /// Fit the model to `data`, starting from `initial_guess` if one is given.
    ///
    /// Implementations report a solver that did not converge as
    /// [`Error::FitDivergence`](crate::Error::FitDivergence), which RANSAC treats as a
    /// failed trial rather than a failed estimate.
    fn fit(
        &self,
        data: &[Self::Data],
        initial_guess: Option<&Self::Parameters>,
    ) -> Result<FitResult<Self::Parameters>>;

    /// Residuals of `parameters` against every point in `data`, in order.
    fn residuals(&self, parameters: &Self::Parameters, data: &[Self::Data])
    -> Result<ResidualVector>;
}
