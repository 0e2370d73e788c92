//! Feature matrix: target version id to capability flags.
//!
//! The matrix is populated once at startup from raw configuration rows and
//! is read-only afterwards. [`FeatureMatrixBuilder`] is append-only; calling
//! [`FeatureMatrixBuilder::build`] freezes it into a [`FeatureMatrix`] that can
//! be shared across threads behind an `Arc` without locking.
//!
//! # Configuration Format
//!
//! ```toml
//! [[target]]
//! version = "legacy-1"
//! exceptionModel = "circuitBreaker"   # or "declarativeClient"
//! multipartSupported = false
//! testRunner = "legacy"               # or "modern"
//! headerPrefix = "jhipsterappApp"
//! ```
//!
//! # Examples
//!
//! ```
//! use clientgen_core::{CapabilityFlag, FeatureMatrix};
//!
//! let matrix = FeatureMatrix::builtin().unwrap();
//! let flags = matrix.flags_for("legacy-1").unwrap();
//! assert!(flags.contains(&CapabilityFlag::CircuitBreakerExceptions));
//! assert!(matrix.flags_for("0.0.1").is_err());
//! ```

use crate::flags::{CapabilityFlag, FlagSet};
use crate::version::TargetVersion;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const BUILTIN_MATRIX: &str = include_str!("../matrix/default.toml");

/// Exception model choice of a raw matrix row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExceptionModel {
    /// Circuit-breaker wrapped client.
    CircuitBreaker,
    /// Declarative HTTP client.
    DeclarativeClient,
}

/// Test runner style of a raw matrix row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestRunnerStyle {
    /// Pre-1.4 Spring Boot test annotations.
    Legacy,
    /// `SpringRunner` + `@SpringBootTest`.
    Modern,
}

/// One raw row as supplied by the configuration source.
///
/// # Examples
///
/// ```
/// use clientgen_core::matrix::{ExceptionModel, MatrixRow, TestRunnerStyle};
///
/// let row = MatrixRow {
///     version: "modern-5".to_string(),
///     exception_model: ExceptionModel::DeclarativeClient,
///     multipart_supported: true,
///     test_runner: TestRunnerStyle::Modern,
///     header_prefix: "myApp".to_string(),
/// };
/// let target = row.into_target().unwrap();
/// assert_eq!(target.flags().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    /// Version identifier (semantic version or symbolic tag)
    pub version: String,
    /// Exception model of the generated client
    pub exception_model: ExceptionModel,
    /// Whether file upload operations can be emitted
    #[serde(default)]
    pub multipart_supported: bool,
    /// Test runner style of the generated tests
    pub test_runner: TestRunnerStyle,
    /// Prefix for alert/params/error header names
    pub header_prefix: String,
}

impl MatrixRow {
    /// Returns the capability flags this row encodes.
    #[must_use]
    pub fn flags(&self) -> FlagSet {
        let mut flags = FlagSet::new();
        flags.insert(match self.exception_model {
            ExceptionModel::CircuitBreaker => CapabilityFlag::CircuitBreakerExceptions,
            ExceptionModel::DeclarativeClient => CapabilityFlag::DeclarativeHttpExceptions,
        });
        flags.insert(match self.test_runner {
            TestRunnerStyle::Legacy => CapabilityFlag::LegacyTestRunner,
            TestRunnerStyle::Modern => CapabilityFlag::ModernTestRunner,
        });
        if self.multipart_supported {
            flags.insert(CapabilityFlag::MultipartUploadSupported);
        }
        flags
    }

    /// Converts the row into a validated [`TargetVersion`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMatrixRow`] if the row is malformed.
    pub fn into_target(self) -> Result<TargetVersion> {
        let flags = self.flags();
        TargetVersion::new(self.version, flags, self.header_prefix)
    }
}

#[derive(Debug, Deserialize)]
struct MatrixFile {
    #[serde(default)]
    target: Vec<MatrixRow>,
}

/// Append-only builder for a [`FeatureMatrix`].
///
/// # Examples
///
/// ```
/// use clientgen_core::{CapabilityFlag, FeatureMatrixBuilder, TargetVersion};
///
/// let mut builder = FeatureMatrixBuilder::new();
/// builder
///     .register(
///         TargetVersion::new(
///             "legacy-1",
///             [
///                 CapabilityFlag::CircuitBreakerExceptions,
///                 CapabilityFlag::LegacyTestRunner,
///             ],
///             "app",
///         )
///         .unwrap(),
///     )
///     .unwrap();
/// let matrix = builder.build();
/// assert_eq!(matrix.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FeatureMatrixBuilder {
    targets: Vec<TargetVersion>,
    index: HashMap<String, usize>,
}

impl FeatureMatrixBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validated target version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateVersion`] if the id is already registered.
    pub fn register(&mut self, target: TargetVersion) -> Result<&mut Self> {
        if self.index.contains_key(target.id()) {
            return Err(Error::DuplicateVersion {
                version: target.id().to_string(),
            });
        }
        self.index.insert(target.id().to_string(), self.targets.len());
        self.targets.push(target);
        Ok(self)
    }

    /// Appends a raw configuration row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row is malformed or its version is already
    /// registered.
    pub fn append_row(&mut self, row: MatrixRow) -> Result<&mut Self> {
        let target = row.into_target()?;
        self.register(target)
    }

    /// Appends every `[[target]]` row of a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the document does not parse, and the
    /// row errors of [`Self::append_row`].
    pub fn append_toml(&mut self, source: &str) -> Result<&mut Self> {
        let file: MatrixFile = toml::from_str(source).map_err(|e| Error::ConfigError {
            message: format!("Failed to parse feature matrix: {e}"),
            source: Some(Box::new(e)),
        })?;
        for row in file.target {
            self.append_row(row)?;
        }
        Ok(self)
    }

    /// Freezes the builder into a read-only matrix.
    #[must_use]
    pub fn build(self) -> FeatureMatrix {
        tracing::debug!("Feature matrix loaded with {} target versions", self.targets.len());
        FeatureMatrix {
            targets: self.targets,
            index: self.index,
        }
    }
}

/// Read-only mapping from target version id to [`TargetVersion`].
///
/// # Thread Safety
///
/// This type is `Send` and `Sync` and holds no interior mutability, so it
/// can be shared by concurrent generation runs without locking.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    targets: Vec<TargetVersion>,
    index: HashMap<String, usize>,
}

impl FeatureMatrix {
    /// Loads the matrix shipped with this crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded configuration is defective.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_MATRIX)
    }

    /// Parses a matrix from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`], [`Error::InvalidMatrixRow`], or
    /// [`Error::DuplicateVersion`].
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut builder = FeatureMatrixBuilder::new();
        builder.append_toml(source)?;
        Ok(builder.build())
    }

    /// Returns the flag set of a version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVersion`] if the id has no registered row.
    pub fn flags_for(&self, version: &str) -> Result<&FlagSet> {
        self.target(version).map(TargetVersion::flags)
    }

    /// Returns the full target version for an id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVersion`] if the id has no registered row.
    pub fn target(&self, version: &str) -> Result<&TargetVersion> {
        self.index
            .get(version)
            .map(|&i| &self.targets[i])
            .ok_or_else(|| Error::UnknownVersion {
                version: version.to_string(),
            })
    }

    /// Iterates target versions in registration order.
    pub fn targets(&self) -> impl Iterator<Item = &TargetVersion> {
        self.targets.iter()
    }

    /// Returns the number of registered versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if no version is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
