//! The assembled output of one generated client.

use super::consistency::Fingerprint;
use crate::common::{FileRole, RenderedFile};
use clientgen_core::TargetVersion;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fully rendered, consistency-checked client for one target version.
///
/// Files are ordered by role, then by the order in which their first
/// fragment was resolved. A `ResolvedUnit` only exists once every check
/// passed; there are no partial units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUnit {
    target: TargetVersion,
    files: Vec<RenderedFile>,
    fingerprint: Fingerprint,
}

impl ResolvedUnit {
    pub(crate) fn new(target: TargetVersion, files: Vec<RenderedFile>, fingerprint: Fingerprint) -> Self {
        Self {
            target,
            files,
            fingerprint,
        }
    }

    /// Returns the target version the unit was resolved against.
    #[must_use]
    pub const fn target(&self) -> &TargetVersion {
        &self.target
    }

    /// Returns the consistency fingerprint.
    #[must_use]
    pub const fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Returns every rendered file.
    #[must_use]
    pub fn files(&self) -> &[RenderedFile] {
        &self.files
    }

    /// Iterates the files of one role.
    pub fn files_for(&self, role: FileRole) -> impl Iterator<Item = &RenderedFile> {
        self.files.iter().filter(move |f| f.role == role)
    }

    /// Looks up a file by its declared type name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&RenderedFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Returns the concatenated text of one role.
    ///
    /// Files are separated by a blank line.
    #[must_use]
    pub fn text(&self, role: FileRole) -> String {
        self.files_for(role)
            .map(|f| f.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns the concatenated text of every role that has files.
    #[must_use]
    pub fn texts(&self) -> BTreeMap<FileRole, String> {
        FileRole::ALL
            .into_iter()
            .filter(|role| self.files_for(*role).next().is_some())
            .map(|role| (role, self.text(role)))
            .collect()
    }

    /// Returns the number of files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
