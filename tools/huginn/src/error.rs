use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Type alias for [`std::result::Result`] containing a huginn [`enum@Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Enum describing the possible errors that can occur in huginn.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to read samples from `{}`", path.display())]
    #[diagnostic(code(huginn::read_samples))]
    ReadSamples {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed record on line {line}: {reason}")]
    #[diagnostic(
        code(huginn::malformed_record),
        help("every row should look like `latitude;longitude;strength`")
    )]
    MalformedRecord { line: u64, reason: String },

    #[error("`{}` contains no samples with a positive strength", path.display())]
    #[diagnostic(code(huginn::no_samples))]
    NoSamples { path: PathBuf },

    #[error("invalid location `{0}`")]
    #[diagnostic(
        code(huginn::invalid_location),
        help("pass the location as `LATITUDE,LONGITUDE`, e.g. `49.754592,9.961313`")
    )]
    InvalidLocation(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] odal::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Estimation(#[from] vegvisir::Error),
}
