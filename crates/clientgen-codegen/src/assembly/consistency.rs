//! Cross-fragment consistency checks and the unit fingerprint.
//!
//! Every resolved fragment records which exclusive flags it committed to.
//! A unit is consistent when all fragments agree with each other and with
//! the target, and when the Operation and Test templates name only the
//! exception family the target's client raises. Only template-owned text
//! is scanned; summaries and other API-supplied values may say anything.

use crate::common::FileRole;
use crate::resolver::ResolvedFragment;
use blake3::Hasher;
use clientgen_core::{CapabilityFlag, Error, ExclusiveGroup, Result, TargetVersion};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Exception type surfaced by a generated client method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExceptionFamily {
    /// Calls wrapped in a circuit breaker
    CircuitBreaker,
    /// Declarative HTTP client
    Declarative,
}

impl ExceptionFamily {
    /// Returns the family raised by a target version.
    #[must_use]
    pub fn of(target: &TargetVersion) -> Self {
        match target.choice(ExclusiveGroup::ExceptionModel) {
            CapabilityFlag::CircuitBreakerExceptions => Self::CircuitBreaker,
            _ => Self::Declarative,
        }
    }

    /// Returns the Java identifier of the exception type.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Self::CircuitBreaker => "HystrixRuntimeException",
            Self::Declarative => "FeignException",
        }
    }

    /// Returns the other family.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::CircuitBreaker => Self::Declarative,
            Self::Declarative => Self::CircuitBreaker,
        }
    }
}

/// Hash over the exclusive flags a unit was resolved with.
///
/// Two units share a fingerprint exactly when they made the same choice in
/// every mutual-exclusion group.
///
/// # Examples
///
/// ```
/// use clientgen_codegen::Fingerprint;
/// use clientgen_core::{CapabilityFlag, ExclusiveGroup};
/// use std::collections::BTreeMap;
///
/// let choices = BTreeMap::from([
///     (ExclusiveGroup::ExceptionModel, CapabilityFlag::DeclarativeHttpExceptions),
///     (ExclusiveGroup::TestRunner, CapabilityFlag::ModernTestRunner),
/// ]);
/// let a = Fingerprint::compute(&choices);
/// let b = Fingerprint::compute(&choices);
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hashes the sorted `group=flag;` choices.
    #[must_use]
    pub fn compute(choices: &BTreeMap<ExclusiveGroup, CapabilityFlag>) -> Self {
        let mut hasher = Hasher::new();
        for (group, flag) in choices {
            hasher.update(group.as_str().as_bytes());
            hasher.update(b"=");
            hasher.update(flag.as_str().as_bytes());
            hasher.update(b";");
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn inconsistent(reason: String) -> Error {
    Error::InconsistentUnit { reason }
}

/// Verifies that the resolved fragments of a unit agree.
///
/// Returns the fingerprint of the target's choices on success.
///
/// # Errors
///
/// Returns [`Error::InconsistentUnit`] if:
/// - a fragment kept both flags of one group,
/// - two fragments kept different flags of one group,
/// - a kept flag differs from the target's choice,
/// - kept Operation or Test template text names the other exception
///   family, or
/// - operations were emitted but Operation or Test template text lacks
///   the target's exception family.
pub fn verify_unit(
    target: &TargetVersion,
    fragments: &[ResolvedFragment],
    has_operations: bool,
) -> Result<Fingerprint> {
    let mut recorded: BTreeMap<ExclusiveGroup, (CapabilityFlag, &str)> = BTreeMap::new();

    for fragment in fragments {
        for (group, flags) in &fragment.selections {
            let mut kept = flags.iter().copied();
            let Some(flag) = kept.next() else {
                continue;
            };
            if let Some(other) = kept.next() {
                return Err(inconsistent(format!(
                    "{} kept both {flag} and {other} ({group})",
                    fragment.template
                )));
            }

            match recorded.get(group) {
                Some((seen, by)) if *seen != flag => {
                    return Err(inconsistent(format!(
                        "{by} chose {seen} but {} chose {flag} ({group})",
                        fragment.template
                    )));
                }
                Some(_) => {}
                None => {
                    recorded.insert(*group, (flag, fragment.template.as_str()));
                }
            }
        }
    }

    let mut choices = BTreeMap::new();
    for group in ExclusiveGroup::ALL {
        let expected = target.choice(group);
        if let Some((flag, by)) = recorded.get(&group)
            && *flag != expected
        {
            return Err(inconsistent(format!(
                "{by} chose {flag} but target {} uses {expected}",
                target.id()
            )));
        }
        choices.insert(group, expected);
    }

    let family = ExceptionFamily::of(target);
    for role in [FileRole::Operation, FileRole::Test] {
        let texts: Vec<&ResolvedFragment> =
            fragments.iter().filter(|f| f.role == role).collect();

        if let Some(offender) = texts
            .iter()
            .find(|f| f.template_text.contains(family.opposite().identifier()))
        {
            return Err(inconsistent(format!(
                "{} references {} but target {} raises {}",
                offender.template,
                family.opposite().identifier(),
                target.id(),
                family.identifier()
            )));
        }

        if has_operations
            && !texts.is_empty()
            && !texts.iter().any(|f| f.template_text.contains(family.identifier()))
        {
            return Err(inconsistent(format!(
                "{role} text never mentions {} raised by target {}",
                family.identifier(),
                target.id()
            )));
        }
    }

    Ok(Fingerprint::compute(&choices))
}
