use miette::Diagnostic;
use thiserror::Error;

/// Type alias for [`std::result::Result`] containing a vegvisir [`enum@Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fitting or estimating a model.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum Error {
    /// A weighted residual was requested for a sample without a usable strength.
    #[error("sample {index} has strength {strength}, weighting needs a positive strength")]
    #[diagnostic(
        code(vegvisir::invalid_weight),
        help("samples with a non-positive strength should be dropped while loading the data")
    )]
    InvalidWeight { index: usize, strength: f64 },

    /// The nonlinear solver stopped without reaching one of its success conditions.
    #[error("nonlinear least squares did not converge: {reason}")]
    #[diagnostic(code(vegvisir::fit_divergence))]
    FitDivergence { reason: String },

    #[error("need at least {required} samples, but only {available} are available")]
    #[diagnostic(code(vegvisir::insufficient_data))]
    InsufficientData { required: usize, available: usize },

    #[error("no consensus set reached the required inlier fraction in {iterations} iterations")]
    #[diagnostic(
        code(vegvisir::no_consensus),
        help("relax `min_inlier_fraction` or `inlier_threshold`, or increase `iterations`")
    )]
    NoConsensusFound { iterations: usize },

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(vegvisir::invalid_config))]
    InvalidConfig(String),
}
