use std::path::PathBuf;

use clap::Parser;
use nalgebra::Point2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use vegvisir::{
    Model, NonlinearFitter, RansacConfig, RansacEstimator, WeightedResidualModel, Weighting,
};

use crate::{Error, Result, config::HuginnConfig, ingest, report::Report};

const WEIGHTINGS: [Weighting; 2] = [Weighting::Uniform, Weighting::InverseSquareStrength];

/// Estimate the location of a recording with every method and print the comparison
#[derive(Parser)]
#[clap(name = "locate")]
pub struct Locate {
    /// Recording with `latitude;longitude;strength` rows
    pub data: PathBuf,

    /// Known location to compare against, as `LATITUDE,LONGITUDE` [default: Set in `huginn.toml`]
    #[clap(long, value_parser = parse_location)]
    pub actual: Option<Point2<f64>>,

    /// Seed for the RANSAC subsets [default: Set in `huginn.toml`, or random]
    #[clap(long)]
    pub seed: Option<u64>,

    /// Number of RANSAC trials [default: Set in `huginn.toml`]
    #[clap(long)]
    pub iterations: Option<usize>,

    /// Number of samples every RANSAC candidate is fitted on [default: Set in `huginn.toml`]
    #[clap(long)]
    pub min_samples: Option<usize>,

    /// Fraction of samples that has to agree with a candidate [default: Set in `huginn.toml`]
    #[clap(long)]
    pub min_inlier_fraction: Option<f64>,

    /// Residual below which a sample agrees with a candidate [default: Set in `huginn.toml`]
    #[clap(long)]
    pub inlier_threshold: Option<f64>,
}

impl Locate {
    pub fn locate(self, config: HuginnConfig) -> Result<()> {
        let report = self.evaluate(&config)?;
        print!("{report}");

        Ok(())
    }

    /// Run every method on the recording.
    ///
    /// Estimation errors end up as failed rows in the report, only problems with the
    /// recording or the configuration are returned.
    pub fn evaluate(&self, config: &HuginnConfig) -> Result<Report> {
        let recording = ingest::load_samples(&self.data)?;
        let samples = &recording.samples;

        let fitter = NonlinearFitter::new(config.solver)?;
        let ransac = self.ransac_config(config);
        let seed = self
            .seed
            .or(config.ransac.seed)
            .unwrap_or_else(|| rand::rng().random());
        tracing::info!(seed, "seeding RANSAC");

        let mut report = Report::new(self.actual.or(config.report.actual_location));

        for weighting in WEIGHTINGS {
            let model = WeightedResidualModel::with_fitter(weighting, fitter.clone());
            report.push_fit(weighting, model.fit(samples, None));
        }

        for weighting in WEIGHTINGS {
            let model = WeightedResidualModel::with_fitter(weighting, fitter.clone());
            let estimator = RansacEstimator::new(model, ransac);

            // every estimate replays the same subsets
            let mut rng = StdRng::seed_from_u64(seed);
            report.push_consensus(
                weighting,
                samples.len(),
                estimator.estimate(samples, &mut rng),
            );
        }

        Ok(report)
    }

    fn ransac_config(&self, config: &HuginnConfig) -> RansacConfig {
        let defaults = config.ransac.estimator;

        RansacConfig {
            iterations: self.iterations.unwrap_or(defaults.iterations),
            min_samples: self.min_samples.unwrap_or(defaults.min_samples),
            min_inlier_fraction: self
                .min_inlier_fraction
                .unwrap_or(defaults.min_inlier_fraction),
            inlier_threshold: self.inlier_threshold.unwrap_or(defaults.inlier_threshold),
        }
    }
}

fn parse_location(value: &str) -> Result<Point2<f64>> {
    let invalid = || Error::InvalidLocation(value.to_string());

    let (latitude, longitude) = value.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = latitude.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = longitude.trim().parse().map_err(|_| invalid())?;

    if !(latitude.is_finite() && longitude.is_finite()) {
        return Err(invalid());
    }

    Ok(Point2::new(latitude, longitude))
}
