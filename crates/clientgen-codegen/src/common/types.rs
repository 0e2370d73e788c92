//! Output types of client assembly.
//!
//! # Examples
//!
//! ```
//! use clientgen_codegen::{FileRole, RenderedFile};
//!
//! let file = RenderedFile {
//!     role: FileRole::Model,
//!     name: "Pet".to_string(),
//!     entity: Some("Pet".to_string()),
//!     content: "public class Pet {}".to_string(),
//! };
//!
//! assert_eq!(file.role.as_str(), "model");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a rendered artifact is for.
///
/// Each role owns one ordered list of fragments in the template library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    /// Data model classes
    Model,
    /// Operation-oriented API client interfaces
    Operation,
    /// Authentication configuration-properties class
    Properties,
    /// Integration tests and test helpers
    Test,
    /// Support classes (alert header helpers)
    Support,
}

impl FileRole {
    /// All roles in assembly order.
    pub const ALL: [Self; 5] = [
        Self::Model,
        Self::Operation,
        Self::Properties,
        Self::Test,
        Self::Support,
    ];

    /// Returns the lowercase role name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Operation => "operation",
            Self::Properties => "properties",
            Self::Test => "test",
            Self::Support => "support",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown file role '{s}'"))
    }
}

/// One rendered artifact of a resolved unit.
///
/// The emission driver decides where it lands on disk; `name` is the Java
/// type name the artifact declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedFile {
    /// Role of the artifact
    pub role: FileRole,
    /// Declared type name (e.g. `PetApiClient`)
    pub name: String,
    /// Entity the artifact was rendered for; `None` for unit-wide artifacts
    pub entity: Option<String>,
    /// Rendered source text
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in FileRole::ALL {
            assert_eq!(role.as_str().parse::<FileRole>().unwrap(), role);
        }
        assert!("fixture".parse::<FileRole>().is_err());
    }

    #[test]
    fn test_role_order_matches_assembly_order() {
        let mut sorted = FileRole::ALL;
        sorted.sort();
        assert_eq!(sorted, FileRole::ALL);
    }
}
