//! Reconciling a fresh manifest with the persisted one.
//!
//! - [`load_existing`]: read the persisted manifest; a missing file is not an error
//! - [`parse_lenient`]: malformed manifests count as empty
//! - [`resolve`]: merge (optionally) and serialize with sorted keys

use std::io::ErrorKind;
use std::path::Path;

use super::{Manifest, Transformer};
use crate::debug;
use crate::error::{RevError, RevResult};

/// Read the persisted manifest at `path`.
///
/// Returns `None` when the file does not exist. Any other read failure
/// is fatal.
pub async fn load_existing(path: &Path) -> RevResult<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(RevError::Io(path.to_path_buf(), err)),
    }
}

/// Parse manifest bytes, treating any failure as an empty manifest.
pub fn parse_lenient(transformer: &dyn Transformer, bytes: &[u8]) -> Manifest {
    let text = String::from_utf8_lossy(bytes);
    match transformer.parse(&text) {
        Ok(manifest) => manifest,
        Err(err) => {
            debug!("manifest"; "ignoring unreadable manifest: {}", err);
            Manifest::new()
        }
    }
}

/// Union of two manifests, `new` winning on key conflict.
pub fn merge(mut old: Manifest, new: Manifest) -> Manifest {
    old.extend(new);
    old
}

/// Produce the serialized manifest, or `None` when it would be empty.
///
/// With `merge_enabled`, non-empty `existing` bytes are parsed leniently
/// and `new` is merged over them.
pub fn resolve(
    existing: Option<&[u8]>,
    new: Manifest,
    merge_enabled: bool,
    transformer: &dyn Transformer,
) -> RevResult<Option<Vec<u8>>> {
    let manifest = match existing {
        Some(bytes) if merge_enabled && !bytes.is_empty() => {
            merge(parse_lenient(transformer, bytes), new)
        }
        _ => new,
    };

    if manifest.is_empty() {
        return Ok(None);
    }
    transformer
        .stringify(&manifest)
        .map(|text| Some(text.into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::JsonTransformer;
    use std::fs;
    use tempfile::TempDir;

    fn manifest(entries: &[(&str, &str)]) -> Manifest {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve_str(existing: Option<&str>, new: Manifest, merge: bool) -> Option<String> {
        resolve(existing.map(str::as_bytes), new, merge, &JsonTransformer)
            .unwrap()
            .map(|bytes| String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_merge_override_law() {
        let old = manifest(&[("a", "c"), ("d", "e")]);
        let new = manifest(&[("a", "b")]);
        assert_eq!(merge(old, new), manifest(&[("a", "b"), ("d", "e")]));
    }

    #[test]
    fn test_resolve_merges_existing() {
        let out = resolve_str(
            Some(r#"{"a": "c", "d": "e"}"#),
            manifest(&[("a", "b")]),
            true,
        )
        .unwrap();
        assert_eq!(out, "{\n  \"a\": \"b\",\n  \"d\": \"e\"\n}");
    }

    #[test]
    fn test_resolve_without_merge_ignores_existing() {
        let out = resolve_str(Some(r#"{"d": "e"}"#), manifest(&[("a", "b")]), false).unwrap();
        assert_eq!(out, "{\n  \"a\": \"b\"\n}");
    }

    #[test]
    fn test_resolve_malformed_existing_is_empty() {
        let out = resolve_str(Some("{not json"), manifest(&[("a", "b")]), true).unwrap();
        assert_eq!(out, "{\n  \"a\": \"b\"\n}");
    }

    #[test]
    fn test_resolve_keeps_entries_beside_non_string_values() {
        let out = resolve_str(
            Some(r#"{"keep.css": "keep-1.css", "meta": {"v": 1}}"#),
            manifest(&[("a.css", "a-2.css")]),
            true,
        )
        .unwrap();
        assert_eq!(
            out,
            "{\n  \"a.css\": \"a-2.css\",\n  \"keep.css\": \"keep-1.css\"\n}"
        );
    }

    #[test]
    fn test_resolve_empty_existing_bytes() {
        let out = resolve_str(Some(""), manifest(&[("a", "b")]), true).unwrap();
        assert_eq!(out, "{\n  \"a\": \"b\"\n}");
    }

    #[test]
    fn test_resolve_empty_manifest_suppressed() {
        assert_eq!(resolve_str(None, Manifest::new(), true), None);
        assert_eq!(resolve_str(Some("{}"), Manifest::new(), true), None);
    }

    #[test]
    fn test_parse_lenient_falls_back() {
        assert!(parse_lenient(&JsonTransformer, b"\xff\xfe").is_empty());
        assert_eq!(
            parse_lenient(&JsonTransformer, br#"{"a": "b"}"#),
            manifest(&[("a", "b")])
        );
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = load_existing(&dir.path().join("rev-manifest.json"))
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rev-manifest.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(load_existing(&path).await.unwrap(), Some(b"{}".to_vec()));
    }

    #[tokio::test]
    async fn test_load_other_failure_is_fatal() {
        // Reading a directory fails with something other than NotFound.
        let dir = TempDir::new().unwrap();
        let err = load_existing(dir.path()).await.unwrap_err();
        assert!(matches!(err, RevError::Io(..)));
    }
}
