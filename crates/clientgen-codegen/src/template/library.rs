//! Loaded, verified collection of fragments.

use super::{FragmentTemplate, parser};
use crate::common::FileRole;
use crate::resolver;
use crate::template_engine::TemplateEngine;
use clientgen_core::{Error, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Built-in fragment sources, one file per role.
const BUILTIN_SOURCES: [(FileRole, &str, &str); 5] = [
    (
        FileRole::Model,
        "model.java.tpl",
        include_str!("../../templates/model.java.tpl"),
    ),
    (
        FileRole::Operation,
        "operation.java.tpl",
        include_str!("../../templates/operation.java.tpl"),
    ),
    (
        FileRole::Properties,
        "properties.java.tpl",
        include_str!("../../templates/properties.java.tpl"),
    ),
    (
        FileRole::Test,
        "test.java.tpl",
        include_str!("../../templates/test.java.tpl"),
    ),
    (
        FileRole::Support,
        "support.java.tpl",
        include_str!("../../templates/support.java.tpl"),
    ),
];

/// Read-only library of fragments, addressed by role and name.
///
/// Loading parses every source, registers each literal with the template
/// engine and checks that each mutual-exclusion group resolves to exactly
/// one sibling under every valid flag combination. After that the library
/// is never mutated and is shared between runs via `Arc`.
///
/// # Examples
///
/// ```
/// use clientgen_codegen::{FileRole, TemplateLibrary};
///
/// let library = TemplateLibrary::builtin().unwrap();
/// assert!(!library.fragments_for(FileRole::Operation).is_empty());
/// assert!(library.fragment(FileRole::Properties, "properties").is_some());
/// ```
#[derive(Debug)]
pub struct TemplateLibrary {
    fragments: BTreeMap<FileRole, Vec<FragmentTemplate>>,
    engine: TemplateEngine,
}

impl TemplateLibrary {
    /// Loads the fragment sources shipped with this crate.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in source fails to load, which indicates
    /// a defect in the shipped templates.
    pub fn builtin() -> Result<Self> {
        BUILTIN_SOURCES
            .into_iter()
            .fold(Self::builder(), |builder, (role, name, source)| {
                builder.add_source(role, name, source)
            })
            .build()
    }

    /// Starts an empty library.
    #[must_use]
    pub fn builder() -> TemplateLibraryBuilder {
        TemplateLibraryBuilder::default()
    }

    /// Returns the fragments of a role in library order.
    #[must_use]
    pub fn fragments_for(&self, role: FileRole) -> &[FragmentTemplate] {
        self.fragments.get(&role).map_or(&[], Vec::as_slice)
    }

    /// Looks up a fragment by role and name.
    #[must_use]
    pub fn fragment(&self, role: FileRole, name: &str) -> Option<&FragmentTemplate> {
        self.fragments_for(role).iter().find(|f| f.name == name)
    }

    /// Returns the engine holding the registered literals.
    #[must_use]
    pub const fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    /// Returns the total number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.values().map(Vec::len).sum()
    }

    /// Returns `true` if the library holds no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects fragment sources before loading them into a [`TemplateLibrary`].
#[derive(Debug, Default)]
pub struct TemplateLibraryBuilder {
    sources: Vec<(FileRole, String, String)>,
}

impl TemplateLibraryBuilder {
    /// Adds the source text of one role.
    ///
    /// A role may have several sources; their fragments are appended in the
    /// order the sources were added.
    #[must_use]
    pub fn add_source(
        mut self,
        role: FileRole,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        self.sources.push((role, name.into(), source.into()));
        self
    }

    /// Parses, registers and verifies every source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateSyntax`] for parse errors, invalid
    /// Handlebars text, or a fragment name used twice within a role, and
    /// [`Error::AmbiguousConditional`] if a mutual-exclusion group does not
    /// resolve to exactly one sibling for some valid flag combination.
    pub fn build(self) -> Result<TemplateLibrary> {
        let mut fragments: BTreeMap<FileRole, Vec<FragmentTemplate>> = BTreeMap::new();
        let mut engine = TemplateEngine::new();

        for (role, source_name, source) in &self.sources {
            for fragment in parser::parse(*role, source_name, source)? {
                let existing = fragments.entry(*role).or_default();
                if existing.iter().any(|f| f.name == fragment.name) {
                    return Err(Error::TemplateSyntax {
                        template: source_name.clone(),
                        line: fragment.line,
                        message: format!("fragment '{}' defined twice", fragment.qualified_name()),
                    });
                }

                engine.register(
                    &fragment.artifact_key,
                    source_name,
                    fragment.line,
                    &fragment.artifact,
                )?;
                for literal in fragment.literals() {
                    engine.register(&literal.key, source_name, literal.line, &literal.text)?;
                }
                resolver::verify_groups(&fragment)?;

                existing.push(fragment);
            }
        }

        let library = TemplateLibrary { fragments, engine };
        debug!(
            sources = self.sources.len(),
            fragments = library.len(),
            "Template library loaded"
        );
        Ok(library)
    }
}
