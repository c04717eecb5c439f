use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

pub mod config;
pub mod locate;

/// `huginn` - Locate a signal source from strength recordings
///
/// `huginn` estimates where a set of signal strength samples was recorded around, using
/// plain nonlinear least squares and RANSAC, each with and without strength weighting,
/// and prints the results side by side.
///
/// # Locating
/// ```sh
/// huginn locate recording.csv
/// ```
/// The recording is a `;`-separated file with `latitude;longitude;strength` rows.
///
/// # Configuration
/// Settings are read from `huginn.toml` in the working directory, or from the directory
/// passed with `--config`. To write the default configuration:
/// ```sh
/// huginn config init
/// ```
#[derive(Parser)]
#[clap(name = "huginn", version)]
pub struct Cli {
    /// Directory containing `huginn.toml`
    #[clap(long = "config", value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Directory containing a `huginn.toml` whose values take precedence
    #[clap(long, value_name = "DIR", global = true, requires = "config_dir")]
    pub overlay: Option<PathBuf>,

    /// Increase log verbosity, overridden by `RUST_LOG`
    #[clap(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub action: Commands,
}

/// All possible commands for the cli, used for clap derive macros.
#[derive(Subcommand)]
pub enum Commands {
    Locate(locate::Locate),
    #[command(subcommand)]
    Config(config::ConfigCommand),
}
