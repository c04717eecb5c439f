//! Location model for signal strength samples.
//!
//! The estimated location is the point minimizing the sum of squared, optionally
//! weighted, distances to the sample locations.
use nalgebra::{DVector, Dyn, OMatrix, Point2, U2};
use serde::{Deserialize, Serialize};

use super::Model;
use crate::{
    Error, FitResult, ResidualVector, Result, Sample,
    solver::{NonlinearFitter, ResidualFunction},
};

/// How each sample's distance contributes to the residual vector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Plain Euclidean distance.
    #[default]
    #[strum(serialize = "unweighted")]
    Uniform,
    /// Distance scaled by `1 / strength²`.
    #[strum(serialize = "weighted")]
    InverseSquareStrength,
}

impl Weighting {
    /// Weight of `sample`, which sits at `index` in its dataset.
    pub fn weight(self, index: usize, sample: &Sample) -> Result<f64> {
        match self {
            Weighting::Uniform => Ok(1.0),
            Weighting::InverseSquareStrength => {
                let strength = sample.strength;
                if strength > 0.0 && strength.is_finite() {
                    Ok(strength.powi(2).recip())
                } else {
                    Err(Error::InvalidWeight { index, strength })
                }
            }
        }
    }
}

/// Estimates a single location from [`Sample`]s.
#[derive(Debug, Clone, Default)]
pub struct WeightedResidualModel {
    weighting: Weighting,
    fitter: NonlinearFitter,
}

impl WeightedResidualModel {
    #[must_use]
    pub fn new(weighting: Weighting) -> Self {
        Self::with_fitter(weighting, NonlinearFitter::default())
    }

    #[must_use]
    pub fn with_fitter(weighting: Weighting, fitter: NonlinearFitter) -> Self {
        Self { weighting, fitter }
    }

    #[must_use]
    pub fn weighting(&self) -> Weighting {
        self.weighting
    }
}

impl Model for WeightedResidualModel {
    // two distances pin down the two coordinates
    const MIN_SAMPLES: usize = 2;

    type Data = Sample;
    type Parameters = Point2<f64>;

    /// Without an initial guess the location of the first sample is used, so the
    /// starting point depends on the dataset order.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(samples = data.len(), weighting = %self.weighting)
    )]
    fn fit(
        &self,
        data: &[Sample],
        initial_guess: Option<&Point2<f64>>,
    ) -> Result<FitResult<Point2<f64>>> {
        if data.len() < Self::MIN_SAMPLES {
            return Err(Error::InsufficientData {
                required: Self::MIN_SAMPLES,
                available: data.len(),
            });
        }

        let distances = WeightedDistances::new(data, self.weighting)?;
        let initial = initial_guess.copied().unwrap_or(data[0].location);
        let minimum = self.fitter.minimize(&distances, initial)?;

        Ok(FitResult {
            parameters: minimum.point,
            sum_squared_residual: distances.residuals(&minimum.point).norm_squared(),
            converged: true,
            evaluations: minimum.evaluations,
        })
    }

    fn residuals(&self, parameters: &Point2<f64>, data: &[Sample]) -> Result<ResidualVector> {
        Ok(WeightedDistances::new(data, self.weighting)?.residuals(parameters))
    }
}

/// Weighted distances from a candidate to every sample of a dataset.
struct WeightedDistances<'a> {
    samples: &'a [Sample],
    weights: Vec<f64>,
}

impl<'a> WeightedDistances<'a> {
    fn new(samples: &'a [Sample], weighting: Weighting) -> Result<Self> {
        let weights = samples
            .iter()
            .enumerate()
            .map(|(index, sample)| weighting.weight(index, sample))
            .collect::<Result<_>>()?;

        Ok(Self { samples, weights })
    }
}

impl ResidualFunction for WeightedDistances<'_> {
    fn residuals(&self, candidate: &Point2<f64>) -> ResidualVector {
        DVector::from_iterator(
            self.samples.len(),
            self.samples
                .iter()
                .zip(&self.weights)
                .map(|(sample, weight)| weight * nalgebra::distance(candidate, &sample.location)),
        )
    }

    fn jacobian(&self, candidate: &Point2<f64>) -> OMatrix<f64, Dyn, U2> {
        let mut jacobian = OMatrix::<f64, Dyn, U2>::zeros(self.samples.len());

        for (row, (sample, weight)) in self.samples.iter().zip(&self.weights).enumerate() {
            let offset = candidate - sample.location;
            let distance = offset.norm();

            // the distance is not differentiable at the sample itself, use the zero subgradient
            if distance > 0.0 {
                let gradient = offset * (weight / distance);
                jacobian[(row, 0)] = gradient.x;
                jacobian[(row, 1)] = gradient.y;
            }
        }

        jacobian
    }
}
