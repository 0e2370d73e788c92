//! Error types for client generation.
//!
//! One error hierarchy is shared by every crate in the workspace. The four
//! run-fatal kinds (`UnknownVersion`, `MissingBinding`, `AmbiguousConditional`,
//! `InconsistentUnit`) abort the generation run of a single target version;
//! the remaining kinds surface while loading configuration or templates.
//!
//! # Examples
//!
//! ```
//! use clientgen_core::{Error, Result};
//!
//! fn require_version(id: &str) -> Result<()> {
//!     if id.is_empty() {
//!         return Err(Error::UnknownVersion {
//!             version: id.to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = require_version("").unwrap_err();
//! assert!(err.is_unknown_version());
//! assert!(err.is_run_fatal());
//! ```

use thiserror::Error;

/// Main error type for client generation.
#[derive(Error, Debug)]
pub enum Error {
    /// The target version has no row in the feature matrix.
    #[error("Unknown target version: {version}")]
    UnknownVersion {
        /// Requested version identifier
        version: String,
    },

    /// A template references a name that is not bound.
    ///
    /// Indicates a defect in the template library or in binding derivation.
    #[error("Template '{template}' references unbound name '{name}'")]
    MissingBinding {
        /// Template the literal belongs to
        template: String,
        /// Name that could not be resolved
        name: String,
    },

    /// Zero or more than one sibling of a mutual-exclusion group matched.
    #[error("Template '{template}': group '{group}' matched {matched} siblings, expected exactly one")]
    AmbiguousConditional {
        /// Template containing the group
        template: String,
        /// Group name as written in the template
        group: String,
        /// Number of siblings whose flags matched
        matched: usize,
    },

    /// Resolved fragments of one unit disagree with each other.
    #[error("Inconsistent unit: {reason}")]
    InconsistentUnit {
        /// Description of the disagreement
        reason: String,
    },

    /// A raw feature matrix row violates the matrix invariants.
    #[error("Invalid feature matrix row '{version}': {reason}")]
    InvalidMatrixRow {
        /// Version identifier of the row
        version: String,
        /// What is wrong with it
        reason: String,
    },

    /// The same version was registered twice.
    #[error("Target version registered twice: {version}")]
    DuplicateVersion {
        /// Duplicated version identifier
        version: String,
    },

    /// Template source could not be parsed.
    #[error("Template syntax error in '{template}' at line {line}: {message}")]
    TemplateSyntax {
        /// Template or source file name
        template: String,
        /// 1-based line number
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// Template engine failure other than a missing binding.
    #[error("Template error: {message}")]
    TemplateError {
        /// Description of the failure
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
        /// Underlying parse error, when there is one
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation error for domain values (names, IR references).
    #[error("Validation error in {field}: {reason}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// An operation was attempted in the wrong run state.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the illegal transition
        message: String,
    },
}

impl Error {
    /// Returns `true` for the error kinds that abort a generation run.
    ///
    /// # Examples
    ///
    /// ```
    /// use clientgen_core::Error;
    ///
    /// let err = Error::InconsistentUnit {
    ///     reason: "test expects FeignException".to_string(),
    /// };
    /// assert!(err.is_run_fatal());
    ///
    /// let err = Error::DuplicateVersion {
    ///     version: "5.0.0".to_string(),
    /// };
    /// assert!(!err.is_run_fatal());
    /// ```
    #[must_use]
    pub const fn is_run_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownVersion { .. }
                | Self::MissingBinding { .. }
                | Self::AmbiguousConditional { .. }
                | Self::InconsistentUnit { .. }
        )
    }

    /// Returns `true` if this is an unknown version error.
    #[must_use]
    pub const fn is_unknown_version(&self) -> bool {
        matches!(self, Self::UnknownVersion { .. })
    }

    /// Returns `true` if this is a missing binding error.
    #[must_use]
    pub const fn is_missing_binding(&self) -> bool {
        matches!(self, Self::MissingBinding { .. })
    }

    /// Returns `true` if this is an ambiguous conditional error.
    #[must_use]
    pub const fn is_ambiguous_conditional(&self) -> bool {
        matches!(self, Self::AmbiguousConditional { .. })
    }

    /// Returns `true` if this is an inconsistent unit error.
    #[must_use]
    pub const fn is_inconsistent_unit(&self) -> bool {
        matches!(self, Self::InconsistentUnit { .. })
    }

    /// Returns `true` if this is a template syntax error.
    #[must_use]
    pub const fn is_template_syntax(&self) -> bool {
        matches!(self, Self::TemplateSyntax { .. })
    }

    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use clientgen_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "missing [[target]] table".to_string(),
    ///     source: None,
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::InvalidMatrixRow { .. } | Self::DuplicateVersion { .. }
        )
    }

    /// Returns `true` if this is a validation error.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }
}

/// Result type alias for generator operations.
///
/// # Examples
///
/// ```
/// use clientgen_core::{Error, Result};
///
/// fn non_empty(value: &str) -> Result<&str> {
///     if value.is_empty() {
///         return Err(Error::ValidationError {
///             field: "value".to_string(),
///             reason: "must not be empty".to_string(),
///         });
///     }
///     Ok(value)
/// }
///
/// assert!(non_empty("pet").is_ok());
/// assert!(non_empty("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;
