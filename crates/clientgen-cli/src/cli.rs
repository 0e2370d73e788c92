//! Command-line arguments.

use crate::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Version-aware client SDK generator.
///
/// Renders Feign client models, API interfaces, properties and integration
/// tests for one or more target application versions.
#[derive(Parser, Debug)]
#[command(name = "clientgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the target versions of the feature matrix.
    ///
    /// # Examples
    ///
    /// ```bash
    /// clientgen versions
    /// clientgen versions --matrix matrix.toml --format json
    /// ```
    Versions {
        /// Feature matrix TOML file; defaults to the built-in matrix
        #[arg(long)]
        matrix: Option<PathBuf>,
    },

    /// Generate clients for one or more target versions.
    ///
    /// # Examples
    ///
    /// ```bash
    /// clientgen generate --api petstore.json --target legacy-1 --target modern-5
    /// clientgen generate --api petstore.json --target modern-5 --output out/
    /// ```
    Generate(GenerateArgs),
}

/// Arguments of `clientgen generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// API description (JSON)
    #[arg(long)]
    pub api: PathBuf,

    /// Target version id; repeat for several versions
    #[arg(long = "target", required = true, num_args = 1)]
    pub targets: Vec<String>,

    /// Feature matrix TOML file; defaults to the built-in matrix
    #[arg(long)]
    pub matrix: Option<PathBuf>,

    /// Client settings TOML file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write artifacts to `<DIR>/<target>/<role>/<name>.java`
    #[arg(long)]
    pub output: Option<PathBuf>,
}
