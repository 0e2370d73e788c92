//! Input loading shared by commands.

use anyhow::{Context, Result};
use clientgen_core::{ApiDescription, ClientSettings, FeatureMatrix};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads the feature matrix from a TOML file, or the built-in one.
pub fn load_matrix(path: Option<&Path>) -> Result<FeatureMatrix> {
    let Some(path) = path else {
        return FeatureMatrix::builtin().context("failed to load built-in feature matrix");
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read feature matrix {}", path.display()))?;
    let matrix = FeatureMatrix::from_toml_str(&source)
        .with_context(|| format!("invalid feature matrix {}", path.display()))?;
    debug!(path = %path.display(), targets = matrix.len(), "Loaded feature matrix");
    Ok(matrix)
}

/// Loads client settings from a TOML file, or the defaults.
pub fn load_settings(path: Option<&Path>) -> Result<ClientSettings> {
    let Some(path) = path else {
        return Ok(ClientSettings::default());
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read client settings {}", path.display()))?;
    ClientSettings::from_toml_str(&source)
        .with_context(|| format!("invalid client settings {}", path.display()))
}

/// Loads the API description from a JSON file.
pub fn load_api(path: &Path) -> Result<ApiDescription> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read API description {}", path.display()))?;
    let api = ApiDescription::from_json_str(&source)
        .with_context(|| format!("invalid API description {}", path.display()))?;
    debug!(
        path = %path.display(),
        entities = api.entities.len(),
        operations = api.operations.len(),
        "Loaded API description"
    );
    Ok(api)
}
