//! File records flowing through the revisioning stages.
//!
//! A [`FileRecord`] is owned by the host pipeline. Stages only move its
//! `path` and attach [`RevInfo`] once it has been renamed.

use std::path::{Path, PathBuf};

use crate::utils::path::{is_sourcemap, rel_path};

/// Payload of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    /// No payload (directories, placeholders). Passed through untouched.
    Null,
    /// Fully materialized bytes.
    Buffered(Vec<u8>),
    /// Payload only available as a stream. Rejected by every stage.
    Streamed,
}

/// Renaming metadata, attached once a record has been revisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevInfo {
    /// Path before renaming.
    pub original_path: PathBuf,
    /// Base before renaming.
    pub original_base: PathBuf,
    /// Content hash inserted into the filename.
    pub hash: String,
}

/// One asset as it flows through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Current location.
    pub path: PathBuf,
    /// Root directory for relative-path computation.
    pub base: PathBuf,
    pub contents: Contents,
    /// Present if and only if the record has passed through renaming.
    pub rev: Option<RevInfo>,
}

impl FileRecord {
    /// Create a record with buffered contents.
    pub fn new(
        path: impl Into<PathBuf>,
        base: impl Into<PathBuf>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self::with_contents(path, base, Contents::Buffered(contents.into()))
    }

    /// Create a record without contents.
    pub fn null(path: impl Into<PathBuf>, base: impl Into<PathBuf>) -> Self {
        Self::with_contents(path, base, Contents::Null)
    }

    /// Create a record whose contents are a stream.
    pub fn streamed(path: impl Into<PathBuf>, base: impl Into<PathBuf>) -> Self {
        Self::with_contents(path, base, Contents::Streamed)
    }

    fn with_contents(path: impl Into<PathBuf>, base: impl Into<PathBuf>, contents: Contents) -> Self {
        Self {
            path: path.into(),
            base: base.into(),
            contents,
            rev: None,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }

    pub const fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Streamed)
    }

    /// Buffered bytes, if any.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.contents {
            Contents::Buffered(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    /// Whether the record was renamed by a revisioning stage.
    pub const fn is_revisioned(&self) -> bool {
        self.rev.is_some()
    }

    /// Whether the record is a sourcemap (`.map` extension).
    pub fn is_sourcemap(&self) -> bool {
        is_sourcemap(&self.path)
    }

    /// Current path relative to `base`, forward slashes.
    pub fn relative(&self) -> String {
        rel_path(&self.base, &self.path)
    }

    /// Original path, if renamed.
    pub fn original_path(&self) -> Option<&Path> {
        self.rev.as_ref().map(|rev| rev.original_path.as_path())
    }
}
