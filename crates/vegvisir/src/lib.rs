//! Robust estimation of a 2-D location from signal strength samples.
//!
//! A [`WeightedResidualModel`] fits a single location to [`Sample`]s with nonlinear least
//! squares, and a [`RansacEstimator`] makes that fit robust against outlying samples.
//!
//! ```no_run
//! use rand::{SeedableRng, rngs::StdRng};
//! use vegvisir::prelude::*;
//!
//! # fn main() -> vegvisir::Result<()> {
//! let samples = vec![
//!     Sample::new(0.0, 0.0, 10.0),
//!     Sample::new(0.0, 10.0, 10.0),
//!     Sample::new(10.0, 0.0, 10.0),
//!     Sample::new(10.0, 10.0, 10.0),
//! ];
//!
//! let model = WeightedResidualModel::new(Weighting::InverseSquareStrength);
//! let plain = model.fit(&samples, None)?;
//!
//! let robust = RansacEstimator::new(model, RansacConfig::default())
//!     .estimate(&samples, &mut StdRng::seed_from_u64(0))?;
//! # Ok(())
//! # }
//! ```
pub mod error;
pub mod model;
pub mod ransac;
pub mod solver;
pub mod types;

pub use error::{Error, Result};
pub use model::{
    Model,
    signal::{WeightedResidualModel, Weighting},
};
pub use ransac::{RansacConfig, RansacEstimator};
pub use solver::{NonlinearFitter, SolverConfig};
pub use types::{ConsensusResult, FitResult, ResidualVector, Sample, TrialStatistics};

pub mod prelude {
    pub use crate::{
        ConsensusResult, FitResult, Model, NonlinearFitter, RansacConfig, RansacEstimator,
        Sample, SolverConfig, WeightedResidualModel, Weighting,
    };
}
