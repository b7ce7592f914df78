//! Buffer-then-flush revisioning with sourcemap co-hashing.
//!
//! Sourcemaps are held back while assets stream through. At flush each
//! sourcemap is matched to the asset it describes and renamed with that
//! asset's hash, so `app-<hash>.js` is always accompanied by
//! `app-<hash>.js.map`.

use std::mem;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::name::{apply_hash, rename};
use crate::debug;
use crate::error::{RevError, RevResult};
use crate::record::FileRecord;
use crate::utils::path::{basename, normalize_lexical, strip_map};

/// Pre-rename asset path → content hash, private to one batch.
type PathMapping = FxHashMap<PathBuf, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Collecting,
    Resolving,
    Done,
}

/// The only sourcemap field we read.
#[derive(Deserialize)]
struct SourceMapHead {
    #[serde(default)]
    file: Option<String>,
}

/// Revisioning stage for one batch of records.
///
/// ```ignore
/// let mut rev = Revisioner::new();
/// for record in records {
///     if let Some(out) = rev.push(record)? {
///         emit(out);
///     }
/// }
/// rev.flush()?.into_iter().for_each(emit);
/// ```
#[derive(Debug)]
pub struct Revisioner {
    phase: Phase,
    sourcemaps: Vec<FileRecord>,
    path_map: PathMapping,
}

impl Default for Revisioner {
    fn default() -> Self {
        Self::new()
    }
}

impl Revisioner {
    pub fn new() -> Self {
        Self {
            phase: Phase::Collecting,
            sourcemaps: Vec::new(),
            path_map: PathMapping::default(),
        }
    }

    /// Feed one record.
    ///
    /// Returns the record to emit now, or `None` when it was buffered.
    pub fn push(&mut self, mut record: FileRecord) -> RevResult<Option<FileRecord>> {
        if self.phase != Phase::Collecting {
            return Err(RevError::Finished(record.path));
        }
        if record.is_null() {
            return Ok(Some(record));
        }
        if record.is_stream() {
            return Err(RevError::Streaming(record.path));
        }
        if record.is_sourcemap() {
            debug!("sourcemap"; "holding {}", record.path.display());
            self.sourcemaps.push(record);
            return Ok(None);
        }

        let old_path = record.path.clone();
        if let Some(digest) = rename(&mut record)? {
            debug!("rev"; "{} -> {}", old_path.display(), record.path.display());
            self.path_map.insert(old_path, digest);
        }
        Ok(Some(record))
    }

    /// Resolve buffered sourcemaps and return them in arrival order.
    ///
    /// Further calls to [`push`](Self::push) fail with [`RevError::Finished`].
    pub fn flush(&mut self) -> RevResult<Vec<FileRecord>> {
        if self.phase == Phase::Done {
            return Ok(Vec::new());
        }
        self.phase = Phase::Resolving;

        let sourcemaps = mem::take(&mut self.sourcemaps);
        let mut resolved = Vec::with_capacity(sourcemaps.len());
        for mut record in sourcemaps {
            self.resolve(&mut record)?;
            resolved.push(record);
        }

        self.path_map.clear();
        self.phase = Phase::Done;
        Ok(resolved)
    }

    /// Number of sourcemaps waiting for flush.
    pub fn pending(&self) -> usize {
        self.sourcemaps.len()
    }

    fn resolve(&self, record: &mut FileRecord) -> RevResult<()> {
        let reference = record
            .bytes()
            .and_then(declared_reference)
            .unwrap_or_else(|| reference_from_filename(&record.path));

        match self.lookup(&record.path, &reference) {
            Some(digest) => {
                debug!("sourcemap"; "{} follows {}", record.path.display(), reference);
                // First-dot insertion on `app.js.map` yields the asset's new
                // name plus `.map`.
                let digest = digest.clone();
                apply_hash(record, &digest);
            }
            None => {
                debug!("sourcemap"; "no asset for {}, hashing own contents", record.path.display());
                rename(record)?;
            }
        }
        Ok(())
    }

    /// Find the hash of the asset a sourcemap refers to.
    ///
    /// The reference is tried verbatim first, then normalized, then
    /// relative to the sourcemap's directory.
    fn lookup(&self, map_path: &Path, reference: &str) -> Option<&String> {
        let reference = Path::new(reference);
        if let Some(digest) = self.path_map.get(reference) {
            return Some(digest);
        }
        if reference.is_absolute() {
            return self.path_map.get(&normalize_lexical(reference));
        }
        let dir = map_path.parent()?;
        self.path_map.get(&normalize_lexical(&dir.join(reference)))
    }
}

/// `file` field of a sourcemap, if the contents parse and it is non-empty.
fn declared_reference(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<SourceMapHead>(bytes)
        .ok()?
        .file
        .filter(|file| !file.is_empty())
}

/// Fallback reference: the sourcemap's own name without `.map`.
fn reference_from_filename(path: &Path) -> String {
    strip_map(path)
        .map(|target| basename(&target))
        .unwrap_or_else(|| basename(path))
}
