//! Named values substituted into literal template text.
//!
//! # Examples
//!
//! ```
//! use clientgen_codegen::Bindings;
//!
//! let bindings = Bindings::new()
//!     .with("entity", "Pet")
//!     .with("fields", vec!["id", "name"]);
//!
//! assert!(bindings.contains("entity"));
//! assert_eq!(bindings.get_str("entity"), Some("Pet"));
//! ```

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered map of binding names to values.
///
/// Serializes as a plain JSON object so it can be handed to the template
/// engine directly. Ordering is by name, which keeps rendering
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, Value>);

impl Bindings {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the set with one more binding, replacing any previous value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Binds a name, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns a copy of `self` overlaid with every binding of `other`.
    #[must_use]
    pub fn overlay(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged
            .0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Returns the value bound to a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the value bound to a name if it is a string.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns `true` if the name is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_prefers_other() {
        let base = Bindings::new().with("entity", "Pet").with("package", "a.b");
        let top = Bindings::new().with("entity", "Tag");
        let merged = base.overlay(&top);

        assert_eq!(merged.get_str("entity"), Some("Tag"));
        assert_eq!(merged.get_str("package"), Some("a.b"));
        // The base is untouched
        assert_eq!(base.get_str("entity"), Some("Pet"));
    }

    #[test]
    fn test_serializes_as_object() {
        let bindings = Bindings::new().with("b", 2).with("a", "x");
        let json = serde_json::to_string(&bindings).unwrap();
        assert_eq!(json, r#"{"a":"x","b":2}"#);
    }
}
