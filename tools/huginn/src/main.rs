use clap::Parser;
use huginn::{
    cli::{Cli, Commands},
    config::HuginnConfig,
};
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    miette::set_panic_hook();

    let args = Cli::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // `config init` has to work even when the current configuration does not parse
    let resolve = || HuginnConfig::resolve(args.config_dir.as_deref(), args.overlay.as_deref());

    match args.action {
        Commands::Locate(opts) => opts.locate(resolve()?)?,
        Commands::Config(opts) => opts.config(resolve)?,
    }

    Ok(())
}
