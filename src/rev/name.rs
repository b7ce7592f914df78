//! Content-hash renaming of a single record.

use crate::error::{RevError, RevResult};
use crate::record::{Contents, FileRecord, RevInfo};
use crate::utils::{hash, path::revision_path};

/// Rename a record in place: `app.min.js` → `app-<hash>.min.js`.
///
/// Null records are left untouched. Streamed records are rejected.
/// Returns the inserted hash, or `None` for null records.
pub fn rename(record: &mut FileRecord) -> RevResult<Option<String>> {
    let digest = match &record.contents {
        Contents::Null => return Ok(None),
        Contents::Streamed => return Err(RevError::Streaming(record.path.clone())),
        Contents::Buffered(bytes) => hash::digest(bytes),
    };

    apply_hash(record, &digest);
    Ok(Some(digest))
}

/// Record rename metadata and rewrite the filename with a known hash.
pub fn apply_hash(record: &mut FileRecord, digest: &str) {
    record.rev = Some(RevInfo {
        original_path: record.path.clone(),
        original_base: record.base.clone(),
        hash: digest.to_owned(),
    });
    record.path = revision_path(&record.path, digest);
}
