//! Result and Error types for the crate.
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result containing an error variant from this module.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration error variants
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// IO error, this wraps a [`std::io::Error`]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The configuration file does not exist.
    #[error("configuration file `{}` does not exist", path.display())]
    #[diagnostic(code(odal::not_found))]
    NotFound { path: PathBuf },

    /// Deserialize error, this wraps a [`toml::de::Error`]
    #[error("failed to parse `{}`", path.display())]
    #[diagnostic(code(odal::deserialize))]
    Deserialize {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Serialize error, this wraps a [`toml::ser::Error`]
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
}
