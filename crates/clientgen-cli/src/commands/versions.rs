//! `clientgen versions`.

use super::common::load_matrix;
use crate::formatters;
use crate::{ExitCode, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// One row of the version listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSummary {
    /// Target version id
    pub version: String,
    /// Capability flags, spelled as in templates
    pub flags: Vec<String>,
    /// Prefix of the alert header names
    pub header_prefix: String,
}

/// Lists the target versions of a matrix in registration order.
pub fn execute(matrix: Option<&Path>) -> Result<Vec<VersionSummary>> {
    let matrix = load_matrix(matrix)?;
    Ok(matrix
        .targets()
        .map(|target| VersionSummary {
            version: target.id().to_string(),
            flags: target.flags().iter().map(ToString::to_string).collect(),
            header_prefix: target.header_prefix().to_string(),
        })
        .collect())
}

/// Prints the version listing.
pub fn run(matrix: Option<&Path>, format: OutputFormat) -> Result<ExitCode> {
    let versions = execute(matrix)?;
    println!("{}", formatters::format_versions(&versions, format)?);
    Ok(ExitCode::SUCCESS)
}
