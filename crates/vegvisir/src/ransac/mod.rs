//! Random sample consensus over any [`Model`].
use rand::{Rng, seq::index};
use serde::{Deserialize, Serialize};

use crate::{ConsensusResult, Error, FitResult, Model, Result, TrialStatistics};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacConfig {
    /// Number of trials, every trial draws exactly one minimal subset.
    pub iterations: usize,
    /// Size of the subset each candidate is fitted on.
    pub min_samples: usize,
    /// Fraction of the dataset that has to agree with a candidate for it to be refined.
    pub min_inlier_fraction: f64,
    /// A data point is an inlier if the absolute value of its residual is below this.
    pub inlier_threshold: f64,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            min_samples: 3,
            min_inlier_fraction: 0.6,
            inlier_threshold: 1e-3,
        }
    }
}

impl RansacConfig {
    /// Check the configuration against a model that needs `model_min_samples` points.
    pub fn validate(&self, model_min_samples: usize) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidConfig("`iterations` must be positive".into()));
        }

        let required = model_min_samples.max(2);
        if self.min_samples < required {
            return Err(Error::InvalidConfig(format!(
                "`min_samples` must be at least {required}, got {}",
                self.min_samples
            )));
        }

        if !(self.min_inlier_fraction > 0.0 && self.min_inlier_fraction <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "`min_inlier_fraction` must be in (0, 1], got {}",
                self.min_inlier_fraction
            )));
        }

        if !(self.inlier_threshold > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "`inlier_threshold` must be positive, got {}",
                self.inlier_threshold
            )));
        }

        Ok(())
    }
}

/// Robust estimator that fits a [`Model`] to random minimal subsets and keeps the
/// candidate with the tightest consensus set.
///
/// Every trial:
/// 1. fits the model to `min_samples` randomly drawn data points,
/// 2. classifies the full dataset into inliers and outliers using the inlier threshold,
/// 3. refits the model on the inliers if they make up at least the minimal inlier fraction.
///
/// The refined candidate with the smallest sum of squared residuals over its own inliers
/// wins, so equally sized consensus sets are ranked by how tightly they fit.
#[derive(Debug, Clone)]
pub struct RansacEstimator<M> {
    model: M,
    config: RansacConfig,
}

enum Trial<P> {
    Accepted {
        fit: FitResult<P>,
        inliers: Vec<usize>,
    },
    Rejected {
        inliers: usize,
    },
    Diverged(Error),
}

impl<M> RansacEstimator<M>
where
    M: Model,
    M::Data: Clone,
{
    #[must_use]
    pub fn new(model: M, config: RansacConfig) -> Self {
        Self { model, config }
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn config(&self) -> &RansacConfig {
        &self.config
    }

    /// Estimate the model parameters best supported by `data`.
    ///
    /// All randomness is drawn from `rng`, so a seeded generator gives reproducible
    /// results. Trials in which the model does not converge are skipped, any other
    /// model error aborts the estimate.
    #[tracing::instrument(skip_all, fields(samples = data.len()))]
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        data: &[M::Data],
        rng: &mut R,
    ) -> Result<ConsensusResult<M::Parameters>> {
        if data.len() < self.config.min_samples {
            return Err(Error::InsufficientData {
                required: self.config.min_samples,
                available: data.len(),
            });
        }
        self.config.validate(M::MIN_SAMPLES)?;

        let mut best: Option<(FitResult<M::Parameters>, Vec<usize>)> = None;
        let mut statistics = TrialStatistics::default();

        for iteration in 0..self.config.iterations {
            match self.trial(data, rng)? {
                Trial::Accepted { fit, inliers } => {
                    statistics.accepted += 1;

                    let improves = best.as_ref().is_none_or(|(best_fit, _)| {
                        fit.sum_squared_residual < best_fit.sum_squared_residual
                    });

                    tracing::debug!(
                        iteration,
                        inliers = inliers.len(),
                        error = fit.sum_squared_residual,
                        improves,
                        "consensus reached"
                    );

                    if improves {
                        best = Some((fit, inliers));
                    }
                }
                Trial::Rejected { inliers } => {
                    statistics.rejected += 1;
                    tracing::debug!(iteration, inliers, "consensus set too small");
                }
                Trial::Diverged(error) => {
                    statistics.diverged += 1;
                    tracing::debug!(iteration, %error, "skipping trial");
                }
            }
        }

        let Some((fit, inliers)) = best else {
            tracing::info!(?statistics, "no consensus found");
            return Err(Error::NoConsensusFound {
                iterations: self.config.iterations,
            });
        };

        tracing::info!(
            inliers = inliers.len(),
            total_error = fit.sum_squared_residual,
            ?statistics,
            "found consensus"
        );

        Ok(ConsensusResult {
            parameters: fit.parameters,
            inliers,
            total_error: fit.sum_squared_residual,
            statistics,
        })
    }

    fn trial<R: Rng + ?Sized>(
        &self,
        data: &[M::Data],
        rng: &mut R,
    ) -> Result<Trial<M::Parameters>> {
        let drawn = index::sample(rng, data.len(), self.config.min_samples).into_vec();
        let subset = gather(data, &drawn);

        let candidate = match self.model.fit(&subset, None) {
            Ok(candidate) => candidate,
            Err(error @ Error::FitDivergence { .. }) => return Ok(Trial::Diverged(error)),
            Err(error) => return Err(in_dataset(error, &drawn)),
        };

        let inliers: Vec<usize> = self
            .model
            .residuals(&candidate.parameters, data)?
            .iter()
            .enumerate()
            .filter(|(_, residual)| residual.abs() < self.config.inlier_threshold)
            .map(|(index, _)| index)
            .collect();

        let fraction = inliers.len() as f64 / data.len() as f64;
        // a consensus set too small to fit on cannot be refined either
        if fraction < self.config.min_inlier_fraction || inliers.len() < M::MIN_SAMPLES {
            return Ok(Trial::Rejected {
                inliers: inliers.len(),
            });
        }

        let consensus = gather(data, &inliers);
        match self.model.fit(&consensus, Some(&candidate.parameters)) {
            Ok(fit) => Ok(Trial::Accepted { fit, inliers }),
            Err(error @ Error::FitDivergence { .. }) => Ok(Trial::Diverged(error)),
            Err(error) => Err(in_dataset(error, &inliers)),
        }
    }
}

fn gather<T: Clone>(data: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&index| data[index].clone()).collect()
}

/// Point an error raised on a gathered subset back at the sample in the full dataset.
fn in_dataset(error: Error, indices: &[usize]) -> Error {
    match error {
        Error::InvalidWeight { index, strength } => Error::InvalidWeight {
            index: indices.get(index).copied().unwrap_or(index),
            strength,
        },
        error => error,
    }
}
