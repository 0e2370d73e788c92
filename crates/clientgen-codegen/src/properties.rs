//! Mapping between [`AuthConfig`] and the generated properties class.
//!
//! [`auth_bindings`] turns each setting into the Java initializer used by
//! the `ApiClientProperties` fragment: a string literal, or `null` when the
//! setting is absent. [`read_back`] parses those initializers out of the
//! rendered class again, so unset and empty values stay distinguishable.
//!
//! # Examples
//!
//! ```
//! use clientgen_codegen::properties::auth_bindings;
//! use clientgen_core::AuthConfig;
//!
//! let auth = AuthConfig {
//!     client_id: Some("web_app".to_string()),
//!     ..AuthConfig::default()
//! };
//! let bindings = auth_bindings(&auth);
//! assert_eq!(bindings.get_str("auth_client_id"), Some("\"web_app\""));
//! assert_eq!(bindings.get_str("auth_password"), Some("null"));
//! assert_eq!(bindings.get_str("auth_scopes"), Some("new ArrayList<String>()"));
//! ```

use crate::Bindings;
use crate::common::java::{string_literal, unescape_literal_body};
use clientgen_core::{AuthConfig, Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// `private String <field> = <null | "literal">;`
static STRING_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*private String (\w+) = (null|"((?:[^"\\]|\\.)*)");\s*$"#)
        .expect("valid regex")
});

/// `private List<String> scopes = new ArrayList<String>(...);`
static SCOPES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*private List<String> scopes = new ArrayList<String>\((?:Arrays\.asList\((.*)\))?\);\s*$",
    )
    .expect("valid regex")
});

static STRING_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("valid regex"));

/// Java field names of the optional settings, paired with binding names.
const STRING_FIELDS: [(&str, &str); 6] = [
    ("url", "auth_url"),
    ("tokenUrl", "auth_token_url"),
    ("clientId", "auth_client_id"),
    ("clientSecret", "auth_client_secret"),
    ("username", "auth_username"),
    ("password", "auth_password"),
];

fn optional_literal(value: Option<&str>) -> String {
    value.map_or_else(|| "null".to_string(), string_literal)
}

fn string_values(auth: &AuthConfig) -> [Option<&str>; 6] {
    [
        auth.base_url.as_deref(),
        auth.token_url.as_deref(),
        auth.client_id.as_deref(),
        auth.client_secret.as_deref(),
        auth.username.as_deref(),
        auth.password.as_deref(),
    ]
}

/// Returns the Java initializers of every auth setting as bindings.
#[must_use]
pub fn auth_bindings(auth: &AuthConfig) -> Bindings {
    let mut bindings = Bindings::new();
    for ((_, binding), value) in STRING_FIELDS.iter().zip(string_values(auth)) {
        bindings.set(*binding, optional_literal(value));
    }

    let scopes = if auth.scopes.is_empty() {
        "new ArrayList<String>()".to_string()
    } else {
        let items: Vec<String> = auth.scopes.iter().map(|s| string_literal(s)).collect();
        format!("new ArrayList<String>(Arrays.asList({}))", items.join(", "))
    };
    bindings.set("auth_scopes", scopes);
    bindings
}

fn unescape(field: &str, body: &str) -> Result<String> {
    unescape_literal_body(body).ok_or_else(|| Error::ValidationError {
        field: field.to_string(),
        reason: format!("malformed string literal \"{body}\""),
    })
}

/// Reads an [`AuthConfig`] back from a rendered properties class.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] naming the field whose declaration is
/// missing or whose literal cannot be parsed.
pub fn read_back(text: &str) -> Result<AuthConfig> {
    let mut found: HashMap<&str, Option<String>> = HashMap::new();
    for captures in STRING_FIELD_RE.captures_iter(text) {
        let (Some(name), Some(raw)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let value = match captures.get(3) {
            Some(body) if raw.as_str() != "null" => Some(unescape(name.as_str(), body.as_str())?),
            _ => None,
        };
        found.insert(name.as_str(), value);
    }

    let mut take = |field: &str| -> Result<Option<String>> {
        found.remove(field).ok_or_else(|| Error::ValidationError {
            field: field.to_string(),
            reason: "declaration not found in properties class".to_string(),
        })
    };

    let base_url = take("url")?;
    let token_url = take("tokenUrl")?;
    let client_id = take("clientId")?;
    let client_secret = take("clientSecret")?;
    let username = take("username")?;
    let password = take("password")?;

    let scopes_match = SCOPES_RE
        .captures(text)
        .ok_or_else(|| Error::ValidationError {
            field: "scopes".to_string(),
            reason: "declaration not found in properties class".to_string(),
        })?;
    let scopes = match scopes_match.get(1) {
        Some(list) => STRING_LITERAL_RE
            .captures_iter(list.as_str())
            .filter_map(|c| c.get(1))
            .map(|body| unescape("scopes", body.as_str()))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(AuthConfig {
        base_url,
        token_url,
        client_id,
        client_secret,
        username,
        password,
        scopes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(auth: &AuthConfig) -> String {
        let bindings = auth_bindings(auth);
        let mut text = String::from("public class ApiClientProperties {\n");
        for (field, binding) in STRING_FIELDS {
            let value = bindings.get_str(binding).unwrap();
            text.push_str(&format!("    private String {field} = {value};\n\n"));
        }
        text.push_str(&format!(
            "    private List<String> scopes = {};\n}}\n",
            bindings.get_str("auth_scopes").unwrap()
        ));
        text
    }

    #[test]
    fn test_default_round_trip() {
        let auth = AuthConfig::default();
        assert_eq!(read_back(&render(&auth)).unwrap(), auth);
    }

    #[test]
    fn test_empty_string_is_not_unset() {
        let auth = AuthConfig {
            username: Some(String::new()),
            scopes: vec![String::new()],
            ..AuthConfig::default()
        };
        let back = read_back(&render(&auth)).unwrap();
        assert_eq!(back.username.as_deref(), Some(""));
        assert_eq!(back.password, None);
        assert_eq!(back.scopes, vec![String::new()]);
    }

    #[test]
    fn test_awkward_values_round_trip() {
        let auth = AuthConfig {
            base_url: Some("http://localhost:8080/api?x=\"1\"".to_string()),
            token_url: Some("back\\slash".to_string()),
            client_id: Some("tab\tand\nnewline".to_string()),
            client_secret: Some("null".to_string()),
            username: Some("ünïcødé".to_string()),
            password: Some("p\"));".to_string()),
            scopes: vec!["read".to_string(), "a, \"b\"".to_string(), "x));".to_string()],
        };
        assert_eq!(read_back(&render(&auth)).unwrap(), auth);
    }

    #[test]
    fn test_missing_declaration() {
        let err = read_back("public class ApiClientProperties {}").unwrap_err();
        assert!(matches!(err, Error::ValidationError { ref field, .. } if field == "url"));
    }

    #[test]
    fn test_missing_scopes() {
        let mut text = render(&AuthConfig::default());
        text = text.replace("private List<String> scopes", "private Set<String> scopes");
        let err = read_back(&text).unwrap_err();
        assert!(matches!(err, Error::ValidationError { ref field, .. } if field == "scopes"));
    }
}
