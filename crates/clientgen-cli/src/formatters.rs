//! Output formatting for command results.

use crate::OutputFormat;
use crate::commands::generate::GenerateReport;
use crate::commands::versions::VersionSummary;
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;

fn json<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Formats the version listing.
pub fn format_versions(versions: &[VersionSummary], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return json(&versions);
    }

    let width = versions.iter().map(|v| v.version.len()).max().unwrap_or(0);
    let mut out = String::new();
    for v in versions {
        let _ = writeln!(
            out,
            "{:width$}  {:16}  {}",
            v.version,
            v.header_prefix,
            v.flags.join(", ")
        );
    }
    Ok(out.trim_end().to_string())
}

/// Formats a generation report.
///
/// # Examples
///
/// ```
/// use clientgen_cli::OutputFormat;
/// use clientgen_cli::commands::generate::{GenerateReport, TargetReport};
/// use clientgen_cli::formatters::format_report;
///
/// let report = GenerateReport {
///     targets: vec![TargetReport {
///         version: "v99".to_string(),
///         fingerprint: None,
///         files: Vec::new(),
///         error: Some("Unknown target version: v99".to_string()),
///     }],
/// };
/// let text = format_report(&report, OutputFormat::Text)?;
/// assert!(text.contains("v99: FAILED"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_report(report: &GenerateReport, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return json(report);
    }

    let mut out = String::new();
    for target in &report.targets {
        match &target.error {
            Some(error) => {
                let _ = writeln!(out, "{}: FAILED: {error}", target.version);
            }
            None => {
                let _ = writeln!(
                    out,
                    "{}: {} files, fingerprint {}",
                    target.version,
                    target.files.len(),
                    target.fingerprint.as_deref().unwrap_or("-")
                );
                for file in &target.files {
                    let _ = match &file.path {
                        Some(path) => writeln!(out, "  {}", path.display()),
                        None => writeln!(out, "  {}/{} ({} bytes)", file.role, file.name, file.bytes),
                    };
                }
            }
        }
    }
    Ok(out.trim_end().to_string())
}
