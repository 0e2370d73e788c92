//! Client generator CLI library.
//!
//! Exposes argument parsing, the command implementations and output
//! formatting so they can be tested without spawning the binary.

#![allow(clippy::missing_errors_doc)]

use clap::ValueEnum;
use std::fmt;

pub mod cli;
pub mod commands;
pub mod formatters;

pub use cli::{Cli, Commands, GenerateArgs};

/// Output format of command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Pretty-printed JSON report
    Json,
}

impl OutputFormat {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Every requested target was generated.
    pub const SUCCESS: Self = Self(0);

    /// At least one target failed.
    pub const ERROR: Self = Self(1);

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Returns `true` for [`ExitCode::SUCCESS`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
