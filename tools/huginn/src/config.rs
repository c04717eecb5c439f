use std::path::Path;

use nalgebra::Point2;
use odal::Config;
use serde::{Deserialize, Serialize};
use vegvisir::{RansacConfig, SolverConfig};

use crate::Result;

/// Configuration for huginn (`huginn.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuginnConfig {
    pub ransac: RansacSettings,
    pub solver: SolverConfig,
    pub report: ReportConfig,
}

impl Config for HuginnConfig {
    const PATH: &'static str = "huginn.toml";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RansacSettings {
    #[serde(flatten)]
    pub estimator: RansacConfig,
    /// Seed for the random subsets, a random seed is picked if none is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Known location to compute the estimation error against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_location: Option<Point2<f64>>,
}

impl HuginnConfig {
    /// Load the configuration from `dir`, or from the working directory if no directory is given.
    ///
    /// Falls back to the defaults if no directory is given and the working directory has
    /// no `huginn.toml`.
    pub fn resolve(dir: Option<&Path>, overlay: Option<&Path>) -> Result<Self> {
        let dir = match dir {
            Some(dir) => dir,
            None if Path::new(Self::PATH).exists() => Path::new("."),
            None => {
                tracing::debug!("no configuration found, using defaults");
                return Ok(Self::default());
            }
        };

        let config = match overlay {
            Some(overlay) => Self::load_with_overlay(dir, overlay)?,
            None => Self::load(dir)?,
        };

        Ok(config)
    }
}
