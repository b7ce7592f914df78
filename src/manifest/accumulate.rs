//! Building manifest entries from renamed records.

use super::Manifest;
use crate::record::FileRecord;
use crate::utils::path::{basename, dirname, join_slash};

/// Caller-owned manifest under construction.
///
/// One accumulator per invocation. Sharing one across concurrent pipelines
/// needs external synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestAccumulator {
    manifest: Manifest,
}

impl ManifestAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the entry for a renamed record.
    ///
    /// Records without rename metadata are ignored (returns `false`).
    /// A later record with the same key overwrites the earlier entry.
    pub fn add(&mut self, record: &FileRecord) -> bool {
        match entry_for(record) {
            Some((original, revisioned)) => {
                self.manifest.insert(original, revisioned);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Replace the accumulated entries.
    pub fn replace(&mut self, manifest: Manifest) {
        self.manifest = manifest;
    }

    pub fn into_inner(self) -> Manifest {
        self.manifest
    }
}

impl From<Manifest> for ManifestAccumulator {
    fn from(manifest: Manifest) -> Self {
        Self { manifest }
    }
}

/// Manifest `(key, value)` for a renamed record.
///
/// The key is the original filename placed in the revisioned file's
/// directory, so lookups are relative to the output tree.
pub fn entry_for(record: &FileRecord) -> Option<(String, String)> {
    let rev = record.rev.as_ref()?;
    if record.path.as_os_str().is_empty() {
        return None;
    }

    let revisioned = record.relative();
    let original = join_slash(dirname(&revisioned), &basename(&rev.original_path));
    Some((original, revisioned))
}
