//! Client generator CLI.
//!
//! # Examples
//!
//! ```bash
//! # List target versions
//! clientgen versions
//!
//! # Generate two versions and write the Java sources
//! clientgen generate --api petstore.json --target legacy-1 --target modern-5 --output out/
//! ```

use anyhow::Result;
use clap::Parser;
use clientgen_cli::commands;
use clientgen_cli::{Cli, Commands, ExitCode};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let exit_code = execute_command(&cli)?;

    std::process::exit(exit_code.as_i32());
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

fn execute_command(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Versions { matrix } => commands::versions::run(matrix.as_deref(), cli.format),
        Commands::Generate(args) => commands::generate::run(args, cli.format),
    }
}
