//! Literal text engine using Handlebars.
//!
//! Every literal segment of the fragment library is registered here under a
//! stable key (`<role>/<fragment>#<n>`) when the library loads. Rendering
//! runs in strict mode so a name missing from the bindings is an error
//! instead of an empty string. HTML escaping is disabled because the output
//! is Java source.
//!
//! # Examples
//!
//! ```
//! use clientgen_codegen::{Bindings, template_engine::TemplateEngine};
//!
//! let mut engine = TemplateEngine::new();
//! engine
//!     .register("model/header#0", "model", 1, "class {{entity}} {}")
//!     .unwrap();
//!
//! let bindings = Bindings::new().with("entity", "Pet");
//! let text = engine.render("model/header#0", "model", &bindings).unwrap();
//! assert_eq!(text, "class Pet {}");
//! ```

use crate::Bindings;
use clientgen_core::{Error, Result};
use handlebars::{Handlebars, RenderErrorReason};

/// Handlebars registry holding every literal of a template library.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`; a loaded engine is shared read-only
/// between concurrent runs.
#[derive(Debug)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Creates an empty engine in strict, non-escaping mode.
    #[must_use]
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        Self { handlebars }
    }

    /// Registers a literal under `key`.
    ///
    /// `template` and `line` locate the literal in its source file for error
    /// reporting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateSyntax`] if the text is not valid Handlebars.
    pub fn register(&mut self, key: &str, template: &str, line: usize, text: &str) -> Result<()> {
        self.handlebars
            .register_template_string(key, text)
            .map_err(|e| Error::TemplateSyntax {
                template: template.to_string(),
                line: line + e.pos().map_or(0, |(l, _)| l.saturating_sub(1)),
                message: e.reason().to_string(),
            })
    }

    /// Renders the literal registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBinding`] if the literal references a name
    /// that is not bound, and [`Error::TemplateError`] for any other
    /// rendering failure (including an unregistered key).
    pub fn render(&self, key: &str, template: &str, bindings: &Bindings) -> Result<String> {
        self.handlebars.render(key, bindings).map_err(|e| match e.reason() {
            RenderErrorReason::MissingVariable(name) => Error::MissingBinding {
                template: template.to_string(),
                name: name.clone().unwrap_or_else(|| "<unknown>".to_string()),
            },
            _ => Error::TemplateError {
                message: format!("Rendering '{key}' failed: {e}"),
            },
        })
    }

    /// Returns `true` if a literal is registered under `key`.
    #[must_use]
    pub fn has_template(&self, key: &str) -> bool {
        self.handlebars.has_template(key)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(key: &str, text: &str) -> TemplateEngine {
        let mut engine = TemplateEngine::new();
        engine.register(key, "test", 1, text).unwrap();
        engine
    }

    #[test]
    fn test_render_simple_substitution() {
        let engine = engine_with("t", "package {{package}};");
        let bindings = Bindings::new().with("package", "com.acme.client");
        assert_eq!(
            engine.render("t", "test", &bindings).unwrap(),
            "package com.acme.client;"
        );
    }

    #[test]
    fn test_no_html_escaping() {
        let engine = engine_with("t", "{{generic}}");
        let bindings = Bindings::new().with("generic", "List<Pet> & \"x\"");
        assert_eq!(
            engine.render("t", "test", &bindings).unwrap(),
            "List<Pet> & \"x\""
        );
    }

    #[test]
    fn test_missing_variable_is_missing_binding() {
        let engine = engine_with("t", "class {{entity}} {}");
        let err = engine.render("t", "model", &Bindings::new()).unwrap_err();

        assert!(err.is_missing_binding());
        match err {
            Error::MissingBinding { template, name } => {
                assert_eq!(template, "model");
                assert_eq!(name, "entity");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_variable_inside_each() {
        let engine = engine_with("t", "{{#each fields}}{{name}}:{{kind}};{{/each}}");
        let bindings = Bindings::new().with("fields", serde_json::json!([{"name": "id"}]));
        let err = engine.render("t", "model", &bindings).unwrap_err();
        assert!(err.is_missing_binding());
    }

    #[test]
    fn test_each_over_list() {
        let engine = engine_with("t", "{{#each items}}{{this}},{{/each}}");
        let bindings = Bindings::new().with("items", vec!["a", "b"]);
        assert_eq!(engine.render("t", "test", &bindings).unwrap(), "a,b,");
    }

    #[test]
    fn test_unregistered_key() {
        let engine = TemplateEngine::new();
        let err = engine.render("nope", "test", &Bindings::new()).unwrap_err();
        assert!(matches!(err, Error::TemplateError { .. }));
    }

    #[test]
    fn test_register_invalid_syntax() {
        let mut engine = TemplateEngine::new();
        let err = engine.register("bad", "model", 7, "Hello {{name").unwrap_err();
        assert!(err.is_template_syntax());
        assert!(!engine.has_template("bad"));
    }

    #[test]
    fn test_has_template() {
        let engine = engine_with("model/header#0", "x");
        assert!(engine.has_template("model/header#0"));
        assert!(!engine.has_template("model/header#1"));
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TemplateEngine>();
    }
}
