use std::path::{Path, PathBuf};

use clap::Subcommand;
use colored::Colorize;
use odal::Config;

use crate::{Result, config::HuginnConfig};

/// Inspect or generate the huginn configuration
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration huginn would run with
    Show,
    /// Write the default configuration to `huginn.toml`
    Init {
        /// Directory to write `huginn.toml` to
        #[clap(default_value = ".")]
        dir: PathBuf,
        /// Overwrite an existing `huginn.toml`
        #[clap(long)]
        force: bool,
    },
}

impl ConfigCommand {
    /// Run the command, `resolve` is only called by commands that read the configuration.
    pub fn config(self, resolve: impl FnOnce() -> Result<HuginnConfig>) -> Result<()> {
        match self {
            ConfigCommand::Show => Self::show(&resolve()?),
            ConfigCommand::Init { dir, force } => Self::init(&dir, force),
        }
    }

    fn show(config: &HuginnConfig) -> Result<()> {
        let contents = toml::to_string_pretty(config).map_err(odal::Error::from)?;
        print!("{contents}");

        Ok(())
    }

    fn init(dir: &Path, force: bool) -> Result<()> {
        let path = dir.join(HuginnConfig::PATH);
        if path.exists() && !force {
            println!(
                "{} `{}` already exists, pass `--force` to overwrite it",
                "Skipping".yellow().bold(),
                path.display()
            );
            return Ok(());
        }

        HuginnConfig::default().store(dir)?;
        println!("{} `{}`", "Created".green().bold(), path.display());

        Ok(())
    }
}
