//! Naming parameters for a generated client.
//!
//! [`ClientSettings`] carries the package names and class names substituted
//! into every fragment, plus the [`AuthConfig`] defaults of the properties
//! class.
//!
//! # Examples
//!
//! ```
//! use clientgen_core::ClientSettings;
//!
//! let settings = ClientSettings::default();
//! assert!(settings.validate().is_ok());
//! assert_eq!(settings.client_package(), "com.mycompany.myapp.client.petstore");
//! ```

use crate::{AuthConfig, Error, Result};
use serde::{Deserialize, Serialize};

/// Java keywords that cannot be used as package segments or class names.
const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while",
];

/// Naming parameters and auth defaults for one generated client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Package under which clients are generated (e.g. `com.acme.app.client`)
    pub base_package: String,
    /// Unique client name; becomes the last package segment
    pub client_name: String,
    /// Package of the host application
    pub app_package: String,
    /// Spring Boot application class used by generated tests
    pub application_class: String,
    /// Defaults for the generated properties class
    pub auth: AuthConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_package: "com.mycompany.myapp.client".to_string(),
            client_name: "petstore".to_string(),
            app_package: "com.mycompany.myapp".to_string(),
            application_class: "Application".to_string(),
            auth: AuthConfig::default(),
        }
    }
}

impl ClientSettings {
    /// Parses settings from a TOML document; missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the document does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use clientgen_core::ClientSettings;
    ///
    /// let settings = ClientSettings::from_toml_str(
    ///     r#"
    ///     clientName = "inventory"
    ///     applicationClass = "JhipsterApp"
    ///
    ///     [auth]
    ///     clientId = "web_app"
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(settings.client_name, "inventory");
    /// assert_eq!(settings.auth.client_id.as_deref(), Some("web_app"));
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::ConfigError {
            message: format!("Failed to parse client settings: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Returns the package of the generated client classes.
    #[must_use]
    pub fn client_package(&self) -> String {
        format!("{}.{}", self.base_package, self.client_name)
    }

    /// Validates the naming parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate_package("base_package", &self.base_package)?;
        validate_package("app_package", &self.app_package)?;
        validate_identifier("client_name", &self.client_name)?;
        validate_identifier("application_class", &self.application_class)?;
        Ok(())
    }
}

/// Checks that a value is a valid Java identifier and not a keyword.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] describing the problem.
pub fn validate_identifier(field: &str, value: &str) -> Result<()> {
    let mut chars = value.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if !valid {
        return Err(Error::ValidationError {
            field: field.to_string(),
            reason: format!("'{value}' is not a valid Java identifier"),
        });
    }

    if JAVA_KEYWORDS.contains(&value) {
        return Err(Error::ValidationError {
            field: field.to_string(),
            reason: format!("'{value}' is a reserved Java keyword"),
        });
    }

    Ok(())
}

fn validate_package(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::ValidationError {
            field: field.to_string(),
            reason: "package cannot be empty".to_string(),
        });
    }
    value
        .split('.')
        .try_for_each(|segment| validate_identifier(field, segment))
}
