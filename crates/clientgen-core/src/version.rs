//! Target versions.
//!
//! A [`TargetVersion`] names a configuration of the framework runtime that
//! generated clients must be compatible with. It is created once from the
//! feature matrix and never mutated.

use crate::flags::{CapabilityFlag, ExclusiveGroup, FlagSet, check_exclusive};
use crate::{Error, Result};
use serde::Serialize;

/// A named target configuration and its capability flags.
///
/// # Examples
///
/// ```
/// use clientgen_core::{CapabilityFlag, ExclusiveGroup, TargetVersion};
///
/// let target = TargetVersion::new(
///     "legacy-1",
///     [
///         CapabilityFlag::CircuitBreakerExceptions,
///         CapabilityFlag::LegacyTestRunner,
///     ],
///     "jhipsterappApp",
/// )
/// .unwrap();
///
/// assert_eq!(target.id(), "legacy-1");
/// assert!(target.has(CapabilityFlag::CircuitBreakerExceptions));
/// assert_eq!(
///     target.choice(ExclusiveGroup::TestRunner),
///     CapabilityFlag::LegacyTestRunner
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetVersion {
    id: String,
    flags: FlagSet,
    header_prefix: String,
}

impl TargetVersion {
    /// Creates a target version, enforcing the mutual-exclusion invariant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMatrixRow`] if the id or header prefix is empty
    /// or if a mutual-exclusion group does not hold exactly one flag.
    pub fn new(
        id: impl Into<String>,
        flags: impl IntoIterator<Item = CapabilityFlag>,
        header_prefix: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let header_prefix = header_prefix.into();
        let flags: FlagSet = flags.into_iter().collect();

        if id.trim().is_empty() {
            return Err(Error::InvalidMatrixRow {
                version: id,
                reason: "version identifier cannot be empty".to_string(),
            });
        }

        if header_prefix.trim().is_empty() || header_prefix.contains(char::is_whitespace) {
            return Err(Error::InvalidMatrixRow {
                version: id,
                reason: format!("invalid header prefix '{header_prefix}'"),
            });
        }

        check_exclusive(&flags).map_err(|reason| Error::InvalidMatrixRow {
            version: id.clone(),
            reason,
        })?;

        Ok(Self {
            id,
            flags,
            header_prefix,
        })
    }

    /// Returns the version identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the ordered flag set.
    #[must_use]
    pub const fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Returns the prefix used to build `X-<prefix>-alert` style headers.
    #[must_use]
    pub fn header_prefix(&self) -> &str {
        &self.header_prefix
    }

    /// Returns `true` if the flag is set.
    #[must_use]
    pub fn has(&self, flag: CapabilityFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Returns the flag chosen for a mutual-exclusion group.
    ///
    /// The constructor guarantees exactly one member is present.
    #[must_use]
    pub fn choice(&self, group: ExclusiveGroup) -> CapabilityFlag {
        let [first, second] = group.members();
        if self.flags.contains(&first) {
            first
        } else {
            second
        }
    }
}
