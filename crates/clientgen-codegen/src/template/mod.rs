//! Template Fragment Library.
//!
//! A fragment is a tree of [`Segment`]s: literal text interleaved with
//! conditional blocks keyed by capability flags. Fragments are written in a
//! line-oriented source format (see [`parser`]) and loaded into a
//! [`TemplateLibrary`], which registers their literals with the
//! [`TemplateEngine`](crate::template_engine::TemplateEngine) and verifies
//! every mutual-exclusion group up front.

pub mod library;
pub mod parser;

pub use library::{TemplateLibrary, TemplateLibraryBuilder};

use crate::common::FileRole;
use clientgen_core::{CapabilityFlag, CrudAction, FlagSet};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How often a fragment is rendered within one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentScope {
    /// Once per client
    Unit,
    /// Once per entity that owns operations
    Entity,
    /// Once per operation of an entity
    Operation,
}

impl FromStr for FragmentScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit" => Ok(Self::Unit),
            "entity" => Ok(Self::Entity),
            "operation" => Ok(Self::Operation),
            other => Err(format!("unknown scope '{other}'")),
        }
    }
}

/// Precondition an entity must meet for an entity-scoped fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Requirement {
    /// The entity owns an operation with this role
    Action(CrudAction),
    /// The entity has a non-id field that can be mutated in tests
    MutableField,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(action) => action.fmt(f),
            Self::MutableField => f.write_str("mutable-field"),
        }
    }
}

impl FromStr for Requirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s {
            "mutable-field" => return Ok(Self::MutableField),
            "create" => CrudAction::Create,
            "read" => CrudAction::Read,
            "update-full" => CrudAction::UpdateFull,
            "update-partial" => CrudAction::UpdatePartial,
            "delete" => CrudAction::Delete,
            "upload" => CrudAction::Upload,
            "query" => CrudAction::Query,
            other => return Err(format!("unknown requirement '{other}'")),
        };
        Ok(Self::Action(action))
    }
}

/// Literal text registered with the template engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralText {
    /// Engine key (`<role>/<fragment>#<n>`)
    pub key: String,
    /// Source line of the first text line
    pub line: usize,
    /// Raw Handlebars text, newlines included
    pub text: String,
}

/// Region kept only when its flags are all present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalBlock {
    /// Flags that must all be set
    pub required: FlagSet,
    /// Mutual-exclusion group among siblings, if any
    pub group: Option<String>,
    /// Source line of the opening directive
    pub line: usize,
    /// Nested segments
    pub body: Vec<Segment>,
}

impl ConditionalBlock {
    /// Returns `true` if every required flag is in `flags`.
    #[must_use]
    pub fn matches(&self, flags: &FlagSet) -> bool {
        self.required.is_subset(flags)
    }

    /// Iterates the required flags that belong to a mutual-exclusion group.
    pub fn exclusive_flags(&self) -> impl Iterator<Item = CapabilityFlag> + '_ {
        self.required.iter().copied().filter(|f| f.group().is_some())
    }
}

/// One node of a fragment tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text substituted with bindings
    Literal(LiteralText),
    /// Flag-gated region
    Conditional(ConditionalBlock),
}

/// A named, parameterized unit of generatable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentTemplate {
    /// Fragment name, unique within its role
    pub name: String,
    /// File role the fragment contributes to
    pub role: FileRole,
    /// Rendering scope
    pub scope: FragmentScope,
    /// Handlebars pattern naming the produced artifact
    pub artifact: String,
    /// Engine key of the artifact pattern
    pub artifact_key: String,
    /// Entity preconditions
    pub requires: Vec<Requirement>,
    /// For operation scope, renders only operations with this role
    pub for_action: Option<CrudAction>,
    /// Top-level segments in document order
    pub segments: Vec<Segment>,
    /// Source line of the `fragment` directive
    pub line: usize,
}

impl FragmentTemplate {
    /// Returns `<role>/<name>`, the name used in diagnostics.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.role, self.name)
    }

    /// Iterates every literal of the tree in document order.
    pub fn literals(&self) -> impl Iterator<Item = &LiteralText> {
        let mut stack: Vec<&Segment> = self.segments.iter().rev().collect();
        std::iter::from_fn(move || {
            while let Some(segment) = stack.pop() {
                match segment {
                    Segment::Literal(literal) => return Some(literal),
                    Segment::Conditional(block) => stack.extend(block.body.iter().rev()),
                }
            }
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(key: &str) -> Segment {
        Segment::Literal(LiteralText {
            key: key.to_string(),
            line: 1,
            text: String::new(),
        })
    }

    #[test]
    fn test_requirement_parsing() {
        assert_eq!(
            "update-partial".parse::<Requirement>(),
            Ok(Requirement::Action(CrudAction::UpdatePartial))
        );
        assert_eq!(
            "mutable-field".parse::<Requirement>(),
            Ok(Requirement::MutableField)
        );
        assert_eq!(
            "query".parse::<Requirement>(),
            Ok(Requirement::Action(CrudAction::Query))
        );
        assert!("search".parse::<Requirement>().is_err());
        assert_eq!(Requirement::Action(CrudAction::UpdateFull).to_string(), "update-full");
    }

    #[test]
    fn test_block_matches_subset() {
        let block = ConditionalBlock {
            required: [
                CapabilityFlag::DeclarativeHttpExceptions,
                CapabilityFlag::MultipartUploadSupported,
            ]
            .into_iter()
            .collect(),
            group: None,
            line: 1,
            body: vec![],
        };

        let mut flags: FlagSet = [
            CapabilityFlag::DeclarativeHttpExceptions,
            CapabilityFlag::ModernTestRunner,
        ]
        .into_iter()
        .collect();
        assert!(!block.matches(&flags));

        flags.insert(CapabilityFlag::MultipartUploadSupported);
        assert!(block.matches(&flags));

        let exclusive: Vec<_> = block.exclusive_flags().collect();
        assert_eq!(exclusive, vec![CapabilityFlag::DeclarativeHttpExceptions]);
    }

    #[test]
    fn test_literals_in_document_order() {
        let fragment = FragmentTemplate {
            name: "header".to_string(),
            role: FileRole::Test,
            scope: FragmentScope::Entity,
            artifact: "{{entity}}ApiTest".to_string(),
            artifact_key: "test/header@artifact".to_string(),
            requires: vec![],
            for_action: None,
            segments: vec![
                literal("a"),
                Segment::Conditional(ConditionalBlock {
                    required: FlagSet::new(),
                    group: None,
                    line: 2,
                    body: vec![literal("b"), literal("c")],
                }),
                literal("d"),
            ],
            line: 1,
        };

        let keys: Vec<_> = fragment.literals().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
        assert_eq!(fragment.qualified_name(), "test/header");
    }
}
