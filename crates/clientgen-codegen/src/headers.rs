//! Alert header conventions of the host application.
//!
//! The generated `HeaderUtil` class builds these headers at runtime; this
//! module produces the same names and values so callers (and tests) can
//! predict them without compiling Java.
//!
//! # Examples
//!
//! ```
//! use clientgen_codegen::headers::{AlertAction, entity_alert};
//!
//! let alert = entity_alert("myApp", "pet", AlertAction::Created, "42");
//! assert_eq!(alert.alert.name, "X-myApp-alert");
//! assert_eq!(alert.alert.value, "myApp.pet.created");
//! assert_eq!(alert.params.name, "X-myApp-params");
//! assert_eq!(alert.params.value, "42");
//! ```

use serde::Serialize;
use std::fmt;

/// Header names derived from a header prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderNames {
    /// `X-<prefix>-alert`
    pub alert: String,
    /// `X-<prefix>-params`
    pub params: String,
    /// `X-<prefix>-error`
    pub error: String,
}

impl HeaderNames {
    /// Builds the three header names for a prefix.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            alert: format!("X-{prefix}-alert"),
            params: format!("X-{prefix}-params"),
            error: format!("X-{prefix}-error"),
        }
    }
}

/// Entity lifecycle event announced through an alert header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    /// Entity was created
    Created,
    /// Entity was updated
    Updated,
    /// Entity was deleted
    Deleted,
}

impl AlertAction {
    /// Returns the message suffix (`created`, `updated`, `deleted`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Header name
    pub name: String,
    /// Header value
    pub value: String,
}

/// Message header plus parameter header, as sent with every alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderPair {
    /// Alert or error header
    pub alert: Header,
    /// `X-<prefix>-params` header
    pub params: Header,
}

/// Builds the headers announcing an entity lifecycle event.
///
/// The message is `<prefix>.<entity>.<action>`; `param` is passed through
/// unchanged.
#[must_use]
pub fn entity_alert(prefix: &str, entity: &str, action: AlertAction, param: &str) -> HeaderPair {
    let names = HeaderNames::new(prefix);
    HeaderPair {
        alert: Header {
            name: names.alert,
            value: format!("{prefix}.{entity}.{action}"),
        },
        params: Header {
            name: names.params,
            value: param.to_string(),
        },
    }
}

/// Builds the headers reporting a failed entity operation.
///
/// # Examples
///
/// ```
/// use clientgen_codegen::headers::failure_alert;
///
/// let failure = failure_alert("myApp", "pet", "idexists");
/// assert_eq!(failure.alert.name, "X-myApp-error");
/// assert_eq!(failure.alert.value, "error.idexists");
/// assert_eq!(failure.params.value, "pet");
/// ```
#[must_use]
pub fn failure_alert(prefix: &str, entity: &str, error_key: &str) -> HeaderPair {
    let names = HeaderNames::new(prefix);
    HeaderPair {
        alert: Header {
            name: names.error,
            value: format!("error.{error_key}"),
        },
        params: Header {
            name: names.params,
            value: entity.to_string(),
        },
    }
}
