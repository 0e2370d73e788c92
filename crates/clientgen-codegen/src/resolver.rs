//! Fragment Resolver.
//!
//! Turns a [`FragmentTemplate`] into text for one flag set:
//!
//! 1. Walk the segment tree depth-first.
//! 2. Render literal text through the template engine with the bindings.
//! 3. Keep a conditional block only if all its flags are set; a dropped
//!    block takes its nested blocks with it.
//! 4. Concatenate the surviving text in document order.
//!
//! Before a sibling list is walked, every mutual-exclusion group in it must
//! have exactly one matching block. A group is a run of adjacent `case`
//! blocks with the same name. The same check runs over all valid
//! flag combinations when the library loads (see [`verify_groups`]).

use crate::Bindings;
use crate::common::FileRole;
use crate::template::{FragmentTemplate, Segment};
use crate::template_engine::TemplateEngine;
use clientgen_core::flags::all_valid_flag_sets;
use clientgen_core::{CapabilityFlag, Error, ExclusiveGroup, FlagSet, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Exclusive flags kept by a resolution, by group.
pub type Selections = BTreeMap<ExclusiveGroup, BTreeSet<CapabilityFlag>>;

/// Text of one resolved fragment plus what it committed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFragment {
    /// Qualified fragment name (`<role>/<name>`)
    pub template: String,
    /// Role of the fragment
    pub role: FileRole,
    /// Rendered artifact name
    pub artifact: String,
    /// Rendered text
    pub text: String,
    /// Kept literal source before substitution; holds no binding values
    pub template_text: String,
    /// Exclusive flags of every block that was kept
    pub selections: Selections,
}

#[derive(Default)]
struct Output {
    text: String,
    template_text: String,
    selections: Selections,
}

/// Renders fragments against one flag set.
///
/// Borrows the engine of a loaded library and holds no other state, so one
/// resolver can serve any number of threads.
///
/// # Examples
///
/// ```
/// use clientgen_codegen::{Bindings, FileRole, FragmentResolver, TemplateLibrary};
/// use clientgen_core::{CapabilityFlag, FlagSet};
///
/// let library = TemplateLibrary::builder()
///     .add_source(
///         FileRole::Operation,
///         "op.tpl",
///         "\
/// #% fragment header artifact={{entity}}ApiClient
/// public interface {{entity}}ApiClient {
/// #% case exceptions circuit-breaker
///     // hystrix
/// #% case exceptions declarative-client
///     // feign
/// #% end
/// }
/// ",
///     )
///     .build()
///     .unwrap();
///
/// let flags: FlagSet = [
///     CapabilityFlag::DeclarativeHttpExceptions,
///     CapabilityFlag::ModernTestRunner,
/// ]
/// .into_iter()
/// .collect();
///
/// let resolver = FragmentResolver::new(library.engine());
/// let fragment = library.fragment(FileRole::Operation, "header").unwrap();
/// let text = resolver
///     .resolve(fragment, &flags, &Bindings::new().with("entity", "Pet"))
///     .unwrap();
/// assert_eq!(text, "public interface PetApiClient {\n    // feign\n}\n");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FragmentResolver<'a> {
    engine: &'a TemplateEngine,
}

impl<'a> FragmentResolver<'a> {
    /// Creates a resolver over the literals registered in `engine`.
    #[must_use]
    pub const fn new(engine: &'a TemplateEngine) -> Self {
        Self { engine }
    }

    /// Renders a fragment to text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousConditional`] if a mutual-exclusion group
    /// matches zero or several siblings, and [`Error::MissingBinding`] if a
    /// kept literal references an unbound name.
    pub fn resolve(
        &self,
        template: &FragmentTemplate,
        flags: &FlagSet,
        bindings: &Bindings,
    ) -> Result<String> {
        self.resolve_fragment(template, flags, bindings)
            .map(|resolved| resolved.text)
    }

    /// Renders a fragment and records the exclusive flags it kept.
    ///
    /// # Errors
    ///
    /// Same as [`FragmentResolver::resolve`].
    pub fn resolve_fragment(
        &self,
        template: &FragmentTemplate,
        flags: &FlagSet,
        bindings: &Bindings,
    ) -> Result<ResolvedFragment> {
        let name = template.qualified_name();
        let mut out = Output::default();
        self.walk(&name, &template.segments, flags, bindings, &mut out)?;
        let artifact = self
            .engine
            .render(&template.artifact_key, &name, bindings)?;

        debug!(template = %name, artifact = %artifact, bytes = out.text.len(), "Resolved fragment");
        Ok(ResolvedFragment {
            template: name,
            role: template.role,
            artifact,
            text: out.text,
            template_text: out.template_text,
            selections: out.selections,
        })
    }

    fn walk(
        &self,
        name: &str,
        segments: &[Segment],
        flags: &FlagSet,
        bindings: &Bindings,
        out: &mut Output,
    ) -> Result<()> {
        check_sibling_groups(name, segments, flags)?;

        for segment in segments {
            match segment {
                Segment::Literal(literal) => {
                    out.text
                        .push_str(&self.engine.render(&literal.key, name, bindings)?);
                    out.template_text.push_str(&literal.text);
                }
                Segment::Conditional(block) if block.matches(flags) => {
                    for flag in block.exclusive_flags() {
                        if let Some(group) = flag.group() {
                            out.selections.entry(group).or_default().insert(flag);
                        }
                    }
                    self.walk(name, &block.body, flags, bindings, out)?;
                }
                Segment::Conditional(_) => {}
            }
        }
        Ok(())
    }
}

/// Checks that each mutual-exclusion group in one sibling list has exactly
/// one matching block.
///
/// A group is a run of adjacent blocks sharing a group name. Literal text
/// or any other block ends the run, so a name may be reused for a later,
/// independent choice.
///
/// # Errors
///
/// Returns [`Error::AmbiguousConditional`] naming the first offending group.
pub fn check_sibling_groups(template: &str, segments: &[Segment], flags: &FlagSet) -> Result<()> {
    let mut run: Option<(&str, usize)> = None;

    for segment in segments {
        let member = match segment {
            Segment::Conditional(block) => block
                .group
                .as_deref()
                .map(|group| (group, usize::from(block.matches(flags)))),
            Segment::Literal(_) => None,
        };

        match (run, member) {
            (Some((current, matched)), Some((group, hit))) if current == group => {
                run = Some((current, matched + hit));
            }
            (finished, next) => {
                if let Some((group, matched)) = finished {
                    exactly_one(template, group, matched)?;
                }
                run = next;
            }
        }
    }

    run.map_or(Ok(()), |(group, matched)| exactly_one(template, group, matched))
}

fn exactly_one(template: &str, group: &str, matched: usize) -> Result<()> {
    if matched == 1 {
        return Ok(());
    }
    Err(Error::AmbiguousConditional {
        template: template.to_string(),
        group: group.to_string(),
        matched,
    })
}

/// Statically verifies every mutual-exclusion group of a fragment.
///
/// Walks the tree once per valid flag combination, descending only into
/// blocks that combination keeps, exactly as resolution would.
///
/// # Errors
///
/// Returns [`Error::AmbiguousConditional`] for the first combination under
/// which a group matches zero or several siblings.
pub fn verify_groups(template: &FragmentTemplate) -> Result<()> {
    let name = template.qualified_name();
    for flags in all_valid_flag_sets() {
        verify_level(&name, &template.segments, &flags)?;
    }
    Ok(())
}

fn verify_level(name: &str, segments: &[Segment], flags: &FlagSet) -> Result<()> {
    check_sibling_groups(name, segments, flags)?;
    for segment in segments {
        if let Segment::Conditional(block) = segment
            && block.matches(flags)
        {
            verify_level(name, &block.body, flags)?;
        }
    }
    Ok(())
}
