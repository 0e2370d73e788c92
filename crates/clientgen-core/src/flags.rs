//! Capability flags distinguishing target versions.
//!
//! A target version is described entirely by its flag set. Two groups of
//! flags are mutually exclusive: the exception model (circuit breaker or
//! declarative client) and the test runner (legacy or modern). Every valid
//! flag set holds exactly one flag of each group.
//!
//! # Examples
//!
//! ```
//! use clientgen_core::{CapabilityFlag, ExclusiveGroup};
//!
//! let flag: CapabilityFlag = "declarative-client".parse().unwrap();
//! assert_eq!(flag, CapabilityFlag::DeclarativeHttpExceptions);
//! assert_eq!(flag.group(), Some(ExclusiveGroup::ExceptionModel));
//! assert_eq!(CapabilityFlag::MultipartUploadSupported.group(), None);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Ordered set of capability flags.
pub type FlagSet = BTreeSet<CapabilityFlag>;

/// A boolean feature toggle distinguishing behavior between target versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityFlag {
    /// Remote calls are wrapped in a circuit breaker; failures surface as
    /// `HystrixRuntimeException`.
    #[serde(rename = "circuit-breaker")]
    CircuitBreakerExceptions,
    /// Declarative HTTP client; failures surface as `FeignException`.
    #[serde(rename = "declarative-client")]
    DeclarativeHttpExceptions,
    /// File upload operations can be emitted.
    #[serde(rename = "multipart")]
    MultipartUploadSupported,
    /// JUnit runner with the pre-1.4 Spring Boot test annotations.
    LegacyTestRunner,
    /// `SpringRunner` with `@SpringBootTest`.
    ModernTestRunner,
}

impl CapabilityFlag {
    /// All flags in declaration order.
    pub const ALL: [Self; 5] = [
        Self::CircuitBreakerExceptions,
        Self::DeclarativeHttpExceptions,
        Self::MultipartUploadSupported,
        Self::LegacyTestRunner,
        Self::ModernTestRunner,
    ];

    /// Returns the spelling used in templates and configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use clientgen_core::CapabilityFlag;
    ///
    /// assert_eq!(CapabilityFlag::CircuitBreakerExceptions.as_str(), "circuit-breaker");
    /// assert_eq!(CapabilityFlag::ModernTestRunner.as_str(), "modern-test-runner");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CircuitBreakerExceptions => "circuit-breaker",
            Self::DeclarativeHttpExceptions => "declarative-client",
            Self::MultipartUploadSupported => "multipart",
            Self::LegacyTestRunner => "legacy-test-runner",
            Self::ModernTestRunner => "modern-test-runner",
        }
    }

    /// Returns the mutual-exclusion group of this flag, if any.
    #[must_use]
    pub const fn group(&self) -> Option<ExclusiveGroup> {
        match self {
            Self::CircuitBreakerExceptions | Self::DeclarativeHttpExceptions => {
                Some(ExclusiveGroup::ExceptionModel)
            }
            Self::LegacyTestRunner | Self::ModernTestRunner => Some(ExclusiveGroup::TestRunner),
            Self::MultipartUploadSupported => None,
        }
    }
}

impl fmt::Display for CapabilityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.as_str() == s)
            .ok_or_else(|| format!("unknown capability flag '{s}'"))
    }
}

/// A group of flags of which exactly one is present per target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusiveGroup {
    /// Circuit breaker vs declarative client.
    ExceptionModel,
    /// Legacy vs modern test runner.
    TestRunner,
}

impl ExclusiveGroup {
    /// All groups in declaration order.
    pub const ALL: [Self; 2] = [Self::ExceptionModel, Self::TestRunner];

    /// Returns the flags belonging to this group.
    #[must_use]
    pub const fn members(&self) -> [CapabilityFlag; 2] {
        match self {
            Self::ExceptionModel => [
                CapabilityFlag::CircuitBreakerExceptions,
                CapabilityFlag::DeclarativeHttpExceptions,
            ],
            Self::TestRunner => [
                CapabilityFlag::LegacyTestRunner,
                CapabilityFlag::ModernTestRunner,
            ],
        }
    }

    /// Returns the group name used in diagnostics and fingerprints.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExceptionModel => "exception-model",
            Self::TestRunner => "test-runner",
        }
    }
}

impl fmt::Display for ExclusiveGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks the mutual-exclusion invariant of a flag set.
///
/// # Errors
///
/// Returns a description of the first group that does not hold exactly one
/// flag.
///
/// # Examples
///
/// ```
/// use clientgen_core::{CapabilityFlag, FlagSet, flags::check_exclusive};
///
/// let ok: FlagSet = [
///     CapabilityFlag::CircuitBreakerExceptions,
///     CapabilityFlag::LegacyTestRunner,
/// ]
/// .into_iter()
/// .collect();
/// assert!(check_exclusive(&ok).is_ok());
///
/// let missing: FlagSet = [CapabilityFlag::LegacyTestRunner].into_iter().collect();
/// assert!(check_exclusive(&missing).is_err());
/// ```
pub fn check_exclusive(flags: &FlagSet) -> Result<(), String> {
    for group in ExclusiveGroup::ALL {
        let present: Vec<_> = group
            .members()
            .into_iter()
            .filter(|flag| flags.contains(flag))
            .collect();
        match present.len() {
            1 => {}
            0 => return Err(format!("no {group} flag present")),
            _ => {
                let names: Vec<_> = present.iter().map(CapabilityFlag::as_str).collect();
                return Err(format!("conflicting {group} flags: {}", names.join(", ")));
            }
        }
    }
    Ok(())
}

/// Enumerates every flag set satisfying the mutual-exclusion invariant.
///
/// Used to verify template libraries statically: any mutual-exclusion group
/// that resolves cleanly for all of these sets resolves cleanly for every
/// target version a matrix can hold.
#[must_use]
pub fn all_valid_flag_sets() -> Vec<FlagSet> {
    let mut sets = Vec::new();
    for exception in ExclusiveGroup::ExceptionModel.members() {
        for runner in ExclusiveGroup::TestRunner.members() {
            for multipart in [false, true] {
                let mut set = FlagSet::new();
                set.insert(exception);
                set.insert(runner);
                if multipart {
                    set.insert(CapabilityFlag::MultipartUploadSupported);
                }
                sets.push(set);
            }
        }
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_roundtrip_through_str() {
        for flag in CapabilityFlag::ALL {
            assert_eq!(flag.as_str().parse::<CapabilityFlag>().unwrap(), flag);
        }
        assert!("hystrix".parse::<CapabilityFlag>().is_err());
    }

    #[test]
    fn test_serde_spelling_matches_as_str() {
        for flag in CapabilityFlag::ALL {
            let json = serde_json::to_string(&flag).unwrap();
            assert_eq!(json, format!("\"{}\"", flag.as_str()));
        }
    }

    #[test]
    fn test_groups_partition_exclusive_flags() {
        for group in ExclusiveGroup::ALL {
            for member in group.members() {
                assert_eq!(member.group(), Some(group));
            }
        }
    }

    #[test]
    fn test_check_exclusive_rejects_conflicts() {
        let both: FlagSet = [
            CapabilityFlag::CircuitBreakerExceptions,
            CapabilityFlag::DeclarativeHttpExceptions,
            CapabilityFlag::ModernTestRunner,
        ]
        .into_iter()
        .collect();
        let err = check_exclusive(&both).unwrap_err();
        assert!(err.contains("conflicting exception-model"));
    }

    #[test]
    fn test_all_valid_flag_sets() {
        let sets = all_valid_flag_sets();
        assert_eq!(sets.len(), 8);
        assert!(sets.iter().all(|set| check_exclusive(set).is_ok()));
    }
}
