//! Parser for fragment source files.
//!
//! A source file holds the fragments of one role. Lines whose first
//! non-blank characters are `#%` are directives; every other line is
//! literal text and keeps its trailing newline.
//!
//! ```text
//! #% fragment header scope=entity artifact={{entity}}ApiClient
//! package {{package}}.api;
//! #% case exceptions circuit-breaker
//! import com.netflix.hystrix.exception.HystrixRuntimeException;
//! #% case exceptions declarative-client
//! import feign.FeignException;
//! #% end
//! ```
//!
//! | Directive | Meaning |
//! |-----------|---------|
//! | `fragment <name> [scope=..] [artifact=..] [requires=a,b] [for=action]` | starts a fragment |
//! | `if <flag>...` | opens a block kept when all flags are set |
//! | `case <group> <flag>...` | same, as one alternative of a mutual-exclusion group |
//! | `end` | closes the innermost block |
//! | `#` (i.e. `#%#`) | comment |
//!
//! A `case` directly following an open `case` of the same group closes it,
//! so one `end` finishes a whole run of alternatives.
//!
//! The `artifact` and `scope` of a fragment default to those of the
//! previous fragment in the same file. `for` is only valid on
//! operation-scoped fragments.

use super::{ConditionalBlock, FragmentScope, FragmentTemplate, LiteralText, Requirement, Segment};
use crate::common::FileRole;
use clientgen_core::{CapabilityFlag, CrudAction, Error, FlagSet, Result};

const DIRECTIVE: &str = "#%";

/// Parses the fragments of one role from source text.
///
/// `source_name` is used in error messages only.
///
/// # Errors
///
/// Returns [`Error::TemplateSyntax`] with the offending line for unknown
/// directives, flags, scopes or requirements, unbalanced `end`, unclosed
/// blocks, literal text before the first fragment, and fragments without an
/// artifact.
///
/// # Examples
///
/// ```
/// use clientgen_codegen::FileRole;
/// use clientgen_codegen::template::parser::parse;
///
/// let source = "\
/// #% fragment model artifact={{entity}}
/// public class {{entity}} {
/// #% if multipart
///     // uploads enabled
/// #% end
/// }
/// ";
/// let fragments = parse(FileRole::Model, "model.java.tpl", source).unwrap();
/// assert_eq!(fragments.len(), 1);
/// assert_eq!(fragments[0].segments.len(), 3);
/// ```
pub fn parse(role: FileRole, source_name: &str, source: &str) -> Result<Vec<FragmentTemplate>> {
    let mut parser = Parser {
        role,
        source_name,
        fragments: Vec::new(),
        current: None,
    };

    for (index, raw) in source.split_inclusive('\n').enumerate() {
        parser.line(index + 1, raw)?;
    }
    parser.finish_fragment()?;

    Ok(parser.fragments)
}

struct OpenBlock {
    required: FlagSet,
    group: Option<String>,
    line: usize,
    body: Vec<Segment>,
}

struct FragmentBuilder {
    name: String,
    scope: FragmentScope,
    artifact: String,
    requires: Vec<Requirement>,
    for_action: Option<CrudAction>,
    line: usize,
    segments: Vec<Segment>,
    open: Vec<OpenBlock>,
    pending: Option<(usize, String)>,
    literal_count: usize,
}

impl FragmentBuilder {
    fn body(&mut self) -> &mut Vec<Segment> {
        match self.open.last_mut() {
            Some(block) => &mut block.body,
            None => &mut self.segments,
        }
    }

    fn flush(&mut self, role: FileRole) {
        if let Some((line, text)) = self.pending.take() {
            let key = format!("{role}/{}#{}", self.name, self.literal_count);
            self.literal_count += 1;
            self.body()
                .push(Segment::Literal(LiteralText { key, line, text }));
        }
    }

    /// Pops the innermost open block into its parent. Returns `false` if
    /// no block is open.
    fn close_innermost(&mut self, role: FileRole) -> bool {
        self.flush(role);
        let Some(block) = self.open.pop() else {
            return false;
        };
        self.body().push(Segment::Conditional(ConditionalBlock {
            required: block.required,
            group: block.group,
            line: block.line,
            body: block.body,
        }));
        true
    }
}

struct Parser<'a> {
    role: FileRole,
    source_name: &'a str,
    fragments: Vec<FragmentTemplate>,
    current: Option<FragmentBuilder>,
}

impl Parser<'_> {
    fn error(&self, line: usize, message: impl Into<String>) -> Error {
        Error::TemplateSyntax {
            template: self.source_name.to_string(),
            line,
            message: message.into(),
        }
    }

    fn line(&mut self, number: usize, raw: &str) -> Result<()> {
        let trimmed = raw.trim_start();
        let Some(directive) = trimmed.strip_prefix(DIRECTIVE) else {
            return self.literal(number, raw);
        };
        if directive.starts_with('#') {
            return Ok(());
        }

        let mut words = directive.split_whitespace();
        let keyword = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        match keyword {
            "fragment" => self.start_fragment(number, &args),
            "if" => {
                let required = self.parse_flags(number, &args)?;
                self.open_block(number, required, None)
            }
            "case" => {
                let Some((group, flags)) = args.split_first() else {
                    return Err(self.error(number, "case needs a group name and flags"));
                };
                let required = self.parse_flags(number, flags)?;
                let role = self.role;
                let builder = self.builder(number)?;
                if builder
                    .open
                    .last()
                    .is_some_and(|block| block.group.as_deref() == Some(*group))
                {
                    builder.close_innermost(role);
                }
                self.open_block(number, required, Some((*group).to_string()))
            }
            "end" => self.close_block(number, &args),
            "" => Err(self.error(number, "empty directive")),
            other => Err(self.error(number, format!("unknown directive '{other}'"))),
        }
    }

    fn literal(&mut self, number: usize, raw: &str) -> Result<()> {
        let Some(builder) = self.current.as_mut() else {
            if raw.trim().is_empty() {
                return Ok(());
            }
            return Err(self.error(number, "literal text before the first fragment"));
        };

        match builder.pending.as_mut() {
            Some((_, text)) => text.push_str(raw),
            None => builder.pending = Some((number, raw.to_string())),
        }
        Ok(())
    }

    fn parse_flags(&self, number: usize, words: &[&str]) -> Result<FlagSet> {
        if words.is_empty() {
            return Err(self.error(number, "block needs at least one flag"));
        }
        words
            .iter()
            .map(|word| {
                word.parse::<CapabilityFlag>()
                    .map_err(|message| self.error(number, message))
            })
            .collect()
    }

    fn builder(&mut self, number: usize) -> Result<&mut FragmentBuilder> {
        let source_name = self.source_name;
        self.current.as_mut().ok_or_else(|| Error::TemplateSyntax {
            template: source_name.to_string(),
            line: number,
            message: "directive before the first fragment".to_string(),
        })
    }

    fn open_block(
        &mut self,
        number: usize,
        required: FlagSet,
        group: Option<String>,
    ) -> Result<()> {
        let role = self.role;
        let builder = self.builder(number)?;
        builder.flush(role);
        builder.open.push(OpenBlock {
            required,
            group,
            line: number,
            body: Vec::new(),
        });
        Ok(())
    }

    fn close_block(&mut self, number: usize, args: &[&str]) -> Result<()> {
        if !args.is_empty() {
            return Err(self.error(number, "end takes no arguments"));
        }
        let role = self.role;
        if self.builder(number)?.close_innermost(role) {
            Ok(())
        } else {
            Err(self.error(number, "end without an open block"))
        }
    }

    fn start_fragment(&mut self, number: usize, args: &[&str]) -> Result<()> {
        let previous = self.finish_fragment()?;

        let Some((name, attributes)) = args.split_first() else {
            return Err(self.error(number, "fragment needs a name"));
        };
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(self.error(number, format!("invalid fragment name '{name}'")));
        }

        let (mut scope, mut artifact) = match previous {
            Some((scope, artifact)) => (scope, Some(artifact)),
            None => (FragmentScope::Entity, None),
        };
        let mut requires = Vec::new();
        let mut for_action = None;

        for attribute in attributes {
            let Some((key, value)) = attribute.split_once('=') else {
                return Err(self.error(number, format!("expected key=value, got '{attribute}'")));
            };
            match key {
                "scope" => {
                    scope = value.parse().map_err(|m: String| self.error(number, m))?;
                }
                "artifact" => artifact = Some(value.to_string()),
                "requires" => {
                    requires = value
                        .split(',')
                        .map(|r| r.parse().map_err(|m: String| self.error(number, m)))
                        .collect::<Result<_>>()?;
                }
                "for" => match value.parse().map_err(|m: String| self.error(number, m))? {
                    Requirement::Action(action) => for_action = Some(action),
                    Requirement::MutableField => {
                        return Err(self.error(number, format!("'{value}' is not an operation role")));
                    }
                },
                other => {
                    return Err(self.error(number, format!("unknown fragment attribute '{other}'")));
                }
            }
        }

        let Some(artifact) = artifact else {
            return Err(self.error(number, format!("fragment '{name}' has no artifact")));
        };
        if for_action.is_some() && scope != FragmentScope::Operation {
            return Err(self.error(number, format!("fragment '{name}' uses for= outside operation scope")));
        }

        self.current = Some(FragmentBuilder {
            name: (*name).to_string(),
            scope,
            artifact,
            requires,
            for_action,
            line: number,
            segments: Vec::new(),
            open: Vec::new(),
            pending: None,
            literal_count: 0,
        });
        Ok(())
    }

    /// Closes the fragment being built and returns its scope and artifact.
    fn finish_fragment(&mut self) -> Result<Option<(FragmentScope, String)>> {
        let Some(mut builder) = self.current.take() else {
            return Ok(None);
        };
        builder.flush(self.role);

        if let Some(block) = builder.open.last() {
            return Err(self.error(
                block.line,
                format!("block in fragment '{}' is never closed", builder.name),
            ));
        }

        let inherited = (builder.scope, builder.artifact.clone());
        self.fragments.push(FragmentTemplate {
            artifact_key: format!("{}/{}@artifact", self.role, builder.name),
            name: builder.name,
            role: self.role,
            scope: builder.scope,
            artifact: builder.artifact,
            requires: builder.requires,
            for_action: builder.for_action,
            segments: builder.segments,
            line: builder.line,
        });
        Ok(Some(inherited))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_test(source: &str) -> Result<Vec<FragmentTemplate>> {
        parse(FileRole::Test, "test.java.tpl", source)
    }

    fn syntax_line(err: Error) -> usize {
        match err {
            Error::TemplateSyntax { line, .. } => line,
            other => panic!("expected syntax error, got {other}"),
        }
    }

    #[test]
    fn test_literal_lines_merge_until_directive() {
        let fragments = parse_test(
            "#% fragment a artifact=X\nline one\nline two\n#% if multipart\nthree\n#% end\nfour\n",
        )
        .unwrap();

        let segments = &fragments[0].segments;
        assert_eq!(segments.len(), 3);
        match &segments[0] {
            Segment::Literal(literal) => {
                assert_eq!(literal.text, "line one\nline two\n");
                assert_eq!(literal.key, "test/a#0");
                assert_eq!(literal.line, 2);
            }
            other => panic!("unexpected segment {other:?}"),
        }
        match &segments[1] {
            Segment::Conditional(block) => {
                assert!(block.group.is_none());
                assert!(block.required.contains(&CapabilityFlag::MultipartUploadSupported));
                assert_eq!(block.body.len(), 1);
            }
            other => panic!("unexpected segment {other:?}"),
        }
        match &segments[2] {
            Segment::Literal(literal) => assert_eq!(literal.key, "test/a#2"),
            other => panic!("unexpected segment {other:?}"),
        }
    }

    #[test]
    fn test_nested_case_blocks() {
        let source = "\
#% fragment a artifact=X
#% case runner legacy-test-runner
#% case ex circuit-breaker
legacy hystrix
#% end
#% case ex declarative-client
legacy feign
#% end
#% end
#% case runner modern-test-runner
modern
#% end
";
        let fragments = parse_test(source).unwrap();
        let segments = &fragments[0].segments;
        assert_eq!(segments.len(), 2);

        let Segment::Conditional(outer) = &segments[0] else {
            panic!("expected block");
        };
        assert_eq!(outer.group.as_deref(), Some("runner"));
        assert_eq!(outer.body.len(), 2);
        assert!(outer
            .body
            .iter()
            .all(|s| matches!(s, Segment::Conditional(b) if b.group.as_deref() == Some("ex"))));
    }

    #[test]
    fn test_case_run_closed_by_one_end() {
        let source = "\
#% fragment a artifact=X
#% case ex circuit-breaker
A
#% case ex declarative-client
B
#% end
after
";
        let fragments = parse_test(source).unwrap();
        let segments = &fragments[0].segments;
        assert_eq!(segments.len(), 3);

        let groups: Vec<_> = segments[..2]
            .iter()
            .map(|s| match s {
                Segment::Conditional(block) => {
                    assert_eq!(block.body.len(), 1);
                    block.group.as_deref()
                }
                Segment::Literal(_) => panic!("expected block"),
            })
            .collect();
        assert_eq!(groups, [Some("ex"), Some("ex")]);
        assert!(matches!(&segments[2], Segment::Literal(l) if l.text == "after\n"));
    }

    #[test]
    fn test_case_of_other_group_nests() {
        let source = "\
#% fragment a artifact=X
#% case runner legacy-test-runner
#% case ex circuit-breaker
legacy hystrix
#% case ex declarative-client
legacy feign
#% end
#% case runner modern-test-runner
modern
#% end
";
        let fragments = parse_test(source).unwrap();
        let segments = &fragments[0].segments;
        assert_eq!(segments.len(), 2);

        let Segment::Conditional(outer) = &segments[0] else {
            panic!("expected block");
        };
        assert_eq!(outer.body.len(), 2);
        let Segment::Conditional(modern) = &segments[1] else {
            panic!("expected block");
        };
        assert_eq!(modern.group.as_deref(), Some("runner"));
    }

    #[test]
    fn test_unclosed_case_run() {
        let source = "#% fragment a artifact=X\n#% case ex circuit-breaker\nA\n#% case ex declarative-client\nB\n";
        let err = parse_test(source).unwrap_err();
        assert_eq!(syntax_line(err), 4);
    }

    #[test]
    fn test_fragment_attributes_and_inheritance() {
        let source = "\
#% fragment header scope=entity artifact={{entity}}ApiTest
a
#% fragment update requires=update-full,read
b
#% fragment utils scope=unit artifact=TestUtils
c
";
        let fragments = parse_test(source).unwrap();
        assert_eq!(fragments.len(), 3);

        assert_eq!(fragments[1].artifact, "{{entity}}ApiTest");
        assert_eq!(fragments[1].scope, FragmentScope::Entity);
        assert_eq!(
            fragments[1].requires,
            vec![
                Requirement::Action(CrudAction::UpdateFull),
                Requirement::Action(CrudAction::Read)
            ]
        );
        assert_eq!(fragments[1].artifact_key, "test/update@artifact");

        assert_eq!(fragments[2].scope, FragmentScope::Unit);
        assert_eq!(fragments[2].artifact, "TestUtils");
        assert!(fragments.iter().all(|f| f.for_action.is_none()));
    }

    #[test]
    fn test_for_attribute_on_operation_scope() {
        let source = "\
#% fragment find scope=operation for=query requires=create artifact={{entity}}ApiTest
a
#% fragment tail scope=entity
b
";
        let fragments = parse_test(source).unwrap();
        assert_eq!(fragments[0].for_action, Some(CrudAction::Query));
        assert_eq!(fragments[0].requires, vec![Requirement::Action(CrudAction::Create)]);
        assert_eq!(fragments[1].for_action, None);
    }

    #[test]
    fn test_comments_and_leading_blank_lines() {
        let source = "\n#%# a comment\n#% fragment a artifact=X\n  #%# indented comment\nbody\n";
        let fragments = parse_test(source).unwrap();
        assert_eq!(fragments[0].literals().count(), 1);
    }

    #[test]
    fn test_indented_directive() {
        let source = "#% fragment a artifact=X\n    #% if multipart\nx\n    #% end\n";
        let fragments = parse_test(source).unwrap();
        assert!(matches!(fragments[0].segments[0], Segment::Conditional(_)));
    }

    #[test]
    fn test_unbalanced_end() {
        let err = parse_test("#% fragment a artifact=X\nbody\n#% end\n").unwrap_err();
        assert_eq!(syntax_line(err), 3);
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_test("#% fragment a artifact=X\n#% if multipart\nbody\n").unwrap_err();
        assert_eq!(syntax_line(err), 2);
    }

    #[test]
    fn test_unclosed_block_before_next_fragment() {
        let err = parse_test("#% fragment a artifact=X\n#% if multipart\n#% fragment b\n")
            .unwrap_err();
        assert_eq!(syntax_line(err), 2);
    }

    #[test]
    fn test_unknown_flag() {
        let err = parse_test("#% fragment a artifact=X\n#% if retries\n#% end\n").unwrap_err();
        assert_eq!(syntax_line(err), 2);
    }

    #[test]
    fn test_unknown_directive() {
        let err = parse_test("#% fragment a artifact=X\n#% else\n").unwrap_err();
        assert_eq!(syntax_line(err), 2);
    }

    #[test]
    fn test_literal_before_fragment() {
        let err = parse_test("orphan\n#% fragment a artifact=X\n").unwrap_err();
        assert_eq!(syntax_line(err), 1);
    }

    #[test]
    fn test_missing_artifact() {
        let err = parse_test("#% fragment a\nbody\n").unwrap_err();
        assert!(err.to_string().contains("no artifact"));
    }

    #[test]
    fn test_bad_attributes() {
        assert!(parse_test("#% fragment a artifact=X scope=global\n").is_err());
        assert!(parse_test("#% fragment a artifact=X requires=search\n").is_err());
        assert!(parse_test("#% fragment a artifact=X for=query\n").is_err());
        assert!(parse_test("#% fragment a artifact=X scope=operation for=mutable-field\n").is_err());
        assert!(parse_test("#% fragment a artifact=X colour=red\n").is_err());
        assert!(parse_test("#% fragment A artifact=X\n").is_err());
        assert!(parse_test("#% case ex\n").is_err());
    }

    #[test]
    fn test_case_requires_flags() {
        let err = parse_test("#% fragment a artifact=X\n#% case exceptions\n#% end\n").unwrap_err();
        assert_eq!(syntax_line(err), 2);
    }

    #[test]
    fn test_last_line_without_newline() {
        let fragments = parse_test("#% fragment a artifact=X\nno newline").unwrap();
        let literal = fragments[0].literals().next().unwrap();
        assert_eq!(literal.text, "no newline");
    }
}
