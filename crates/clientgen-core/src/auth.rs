//! Authentication configuration emitted into the generated properties class.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Values baked into the generated `ApiClientProperties` class.
///
/// Every field except `scopes` is optional; `None` means unset and is
/// emitted as `null`, never as an empty string. `scopes` defaults to an
/// empty list.
///
/// # Examples
///
/// ```
/// use clientgen_core::AuthConfig;
///
/// let config = AuthConfig::default();
/// assert!(config.base_url.is_none());
/// assert!(config.scopes.is_empty());
///
/// let config = AuthConfig {
///     client_id: Some("web_app".to_string()),
///     scopes: vec!["read".to_string(), "write".to_string()],
///     ..AuthConfig::default()
/// };
/// assert_eq!(config.scopes.len(), 2);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    /// Base URL of the remote API
    pub base_url: Option<String>,
    /// OAuth2 token endpoint
    pub token_url: Option<String>,
    /// OAuth2 client id
    pub client_id: Option<String>,
    /// OAuth2 client secret
    pub client_secret: Option<String>,
    /// Resource owner username
    pub username: Option<String>,
    /// Resource owner password
    pub password: Option<String>,
    /// Requested OAuth2 scopes, in order
    pub scopes: Vec<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: Option<&String>) -> Option<&'static str> {
            value.map(|_| "[REDACTED]")
        }

        f.debug_struct("AuthConfig")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(self.client_secret.as_ref()))
            .field("username", &self.username)
            .field("password", &redact(self.password.as_ref()))
            .field("scopes", &self.scopes)
            .finish()
    }
}
