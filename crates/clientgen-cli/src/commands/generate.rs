//! `clientgen generate`.
//!
//! Runs every requested target version against the same API description
//! and settings. One failing target does not stop the others; the command
//! exits non-zero if any failed.

use super::common::{load_api, load_matrix, load_settings};
use crate::cli::GenerateArgs;
use crate::formatters;
use crate::{ExitCode, OutputFormat};
use anyhow::{Context, Result};
use clientgen_codegen::{Generator, RenderedFile, ResolvedUnit, TemplateLibrary};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// One rendered file in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    /// File role (`model`, `operation`, ...)
    pub role: String,
    /// Declared type name
    pub name: String,
    /// Size of the rendered text
    pub bytes: usize,
    /// Location on disk, when written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Outcome of one target version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    /// Requested target version id
    pub version: String,
    /// Consistency fingerprint of the unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Rendered files
    pub files: Vec<FileSummary>,
    /// Error message if the run failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TargetReport {
    /// Returns `true` if the target was generated.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Report of a `generate` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    /// One entry per requested target, in request order
    pub targets: Vec<TargetReport>,
}

impl GenerateReport {
    /// Returns the exit code for this report.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.targets.iter().all(TargetReport::succeeded) {
            ExitCode::SUCCESS
        } else {
            ExitCode::ERROR
        }
    }
}

/// Returns `<dir>/<target>/<role>/<name>.java`.
#[must_use]
pub fn artifact_path(dir: &Path, target: &str, file: &RenderedFile) -> PathBuf {
    dir.join(target)
        .join(file.role.as_str())
        .join(format!("{}.java", file.name))
}

fn write_unit(dir: &Path, unit: &ResolvedUnit) -> Result<Vec<PathBuf>> {
    unit.files()
        .iter()
        .map(|file| {
            let path = artifact_path(dir, unit.target().id(), file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&path, &file.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect()
}

fn summarize(unit: &ResolvedUnit, paths: Option<Vec<PathBuf>>) -> TargetReport {
    let mut paths = paths.map(Vec::into_iter);
    TargetReport {
        version: unit.target().id().to_string(),
        fingerprint: Some(unit.fingerprint().to_string()),
        files: unit
            .files()
            .iter()
            .map(|file| FileSummary {
                role: file.role.to_string(),
                name: file.name.clone(),
                bytes: file.content.len(),
                path: paths.as_mut().and_then(Iterator::next),
            })
            .collect(),
        error: None,
    }
}

/// Generates every requested target and optionally writes the artifacts.
///
/// Fails only if the inputs cannot be loaded or artifacts cannot be
/// written; generation errors are reported per target.
pub fn execute(args: &GenerateArgs) -> Result<GenerateReport> {
    let matrix = load_matrix(args.matrix.as_deref())?;
    let settings = load_settings(args.config.as_deref())?;
    let api = load_api(&args.api)?;
    let library = TemplateLibrary::builtin().context("failed to load built-in templates")?;
    let generator = Generator::new(Arc::new(matrix), Arc::new(library));

    let mut targets = Vec::with_capacity(args.targets.len());
    for outcome in generator.run_many(&args.targets, &api, &settings) {
        match outcome.result {
            Ok(unit) => {
                let paths = match &args.output {
                    Some(dir) => Some(write_unit(dir, &unit)?),
                    None => None,
                };
                info!(version = %outcome.version, files = unit.file_count(), "Generated client");
                targets.push(summarize(&unit, paths));
            }
            Err(e) => {
                warn!(version = %outcome.version, error = %e, "Target failed");
                targets.push(TargetReport {
                    version: outcome.version,
                    fingerprint: None,
                    files: Vec::new(),
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(GenerateReport { targets })
}

/// Generates and prints the report.
pub fn run(args: &GenerateArgs, format: OutputFormat) -> Result<ExitCode> {
    let report = execute(args)?;
    println!("{}", formatters::format_report(&report, format)?);
    Ok(report.exit_code())
}
