//! Manifest stages a host pipeline drives.
//!
//! - [`ManifestStage`]: collects renamed records for one invocation and emits
//!   a single manifest record at [`finish`](ManifestStage::finish)
//! - [`ManifestMergeStage`]: folds renamed records into a caller-owned
//!   [`ManifestAccumulator`] and merges it into incoming manifest records

use std::path::{Path, PathBuf};

use super::merge::{load_existing, merge, parse_lenient, resolve};
use super::{ManifestAccumulator, ManifestFormat, Transformer};
use crate::debug;
use crate::error::RevResult;
use crate::record::{Contents, FileRecord};

/// Default manifest location.
pub const DEFAULT_MANIFEST_PATH: &str = "rev-manifest.json";

/// Options for [`ManifestStage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestOptions {
    /// Where the persisted manifest is read from and the emitted record points.
    pub path: PathBuf,
    /// Merge with the persisted manifest instead of replacing it.
    pub merge: bool,
    pub format: ManifestFormat,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            merge: false,
            format: ManifestFormat::default(),
        }
    }
}

impl ManifestOptions {
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    pub fn with_format(mut self, format: ManifestFormat) -> Self {
        self.format = format;
        self
    }
}

impl From<&str> for ManifestOptions {
    fn from(path: &str) -> Self {
        PathBuf::from(path).into()
    }
}

impl From<PathBuf> for ManifestOptions {
    fn from(path: PathBuf) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }
}

// ============================================================================
// ManifestStage
// ============================================================================

/// Per-invocation manifest builder.
pub struct ManifestStage {
    options: ManifestOptions,
    transformer: Box<dyn Transformer>,
    entries: ManifestAccumulator,
}

impl ManifestStage {
    /// Create a stage using the codec named by `options.format`.
    pub fn new(options: impl Into<ManifestOptions>) -> Self {
        let options = options.into();
        let transformer = options.format.transformer();
        Self {
            options,
            transformer,
            entries: ManifestAccumulator::new(),
        }
    }

    /// Replace the codec with a custom one.
    pub fn with_transformer(mut self, transformer: Box<dyn Transformer>) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn options(&self) -> &ManifestOptions {
        &self.options
    }

    /// Record a renamed file. Unrenamed records are ignored.
    pub fn push(&mut self, record: &FileRecord) -> bool {
        self.entries.add(record)
    }

    /// Number of entries collected so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the manifest record.
    ///
    /// Returns `None` without touching storage when nothing was collected.
    pub async fn finish(self) -> RevResult<Option<FileRecord>> {
        if self.entries.is_empty() {
            debug!("manifest"; "nothing to manifest");
            return Ok(None);
        }

        let path = self.options.path;
        let existing = load_existing(&path).await?;
        let Some(bytes) = resolve(
            existing.as_deref(),
            self.entries.into_inner(),
            self.options.merge,
            self.transformer.as_ref(),
        )?
        else {
            return Ok(None);
        };

        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Some(FileRecord::new(path, base, bytes)))
    }
}

// ============================================================================
// ManifestMergeStage
// ============================================================================

/// Builds a manifest across invocations in an accumulator the caller owns.
///
/// Renamed records go in through [`collect`](Self::collect); manifest records
/// passed to [`merge`](Self::merge) are parsed, overlaid with the accumulated
/// entries and rewritten. The merged result becomes the accumulator's new
/// state.
pub struct ManifestMergeStage<'a> {
    accumulator: &'a mut ManifestAccumulator,
    transformer: Box<dyn Transformer>,
}

impl<'a> ManifestMergeStage<'a> {
    pub fn new(accumulator: &'a mut ManifestAccumulator) -> Self {
        Self::with_transformer(accumulator, ManifestFormat::default().transformer())
    }

    pub fn with_transformer(
        accumulator: &'a mut ManifestAccumulator,
        transformer: Box<dyn Transformer>,
    ) -> Self {
        Self {
            accumulator,
            transformer,
        }
    }

    /// Add a renamed record to the accumulator.
    pub fn collect(&mut self, record: &FileRecord) -> bool {
        self.accumulator.add(record)
    }

    /// Merge the accumulator into a manifest record and rewrite its contents.
    pub fn merge(&mut self, mut record: FileRecord) -> RevResult<FileRecord> {
        let old = record
            .bytes()
            .map(|bytes| parse_lenient(self.transformer.as_ref(), bytes))
            .unwrap_or_default();
        let merged = merge(old, self.accumulator.manifest().clone());

        let text = self.transformer.stringify(&merged)?;
        self.accumulator.replace(merged);
        record.contents = Contents::Buffered(text.into_bytes());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Manifest, TomlTransformer};
    use crate::rev::rename;
    use crate::utils::hash;
    use std::fs;
    use tempfile::TempDir;

    fn renamed(path: &str, base: &str, contents: &str) -> FileRecord {
        let mut record = FileRecord::new(path, base, contents);
        rename(&mut record).unwrap();
        record
    }

    fn text(record: &FileRecord) -> &str {
        std::str::from_utf8(record.bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_options_from_path() {
        let options = ManifestOptions::from("assets/manifest.json");
        assert_eq!(options.path, PathBuf::from("assets/manifest.json"));
        assert!(!options.merge);
        assert_eq!(ManifestOptions::default().path, PathBuf::from("rev-manifest.json"));
    }

    #[tokio::test]
    async fn test_single_record_scenario() {
        let dir = TempDir::new().unwrap();
        let mut stage = ManifestStage::new(dir.path().join("rev-manifest.json"));
        assert!(stage.push(&renamed("/src/a.css", "/src", "x")));

        let record = stage.finish().await.unwrap().unwrap();
        let digest = hash::digest("x");
        assert_eq!(
            text(&record),
            format!("{{\n  \"a.css\": \"a-{digest}.css\"\n}}")
        );
        assert_eq!(record.path, dir.path().join("rev-manifest.json"));
        assert_eq!(record.base, dir.path());
    }

    #[tokio::test]
    async fn test_empty_batch_emits_nothing() {
        let dir = TempDir::new().unwrap();
        let mut stage = ManifestStage::new(dir.path().join("rev-manifest.json"));
        assert!(!stage.push(&FileRecord::new("/src/a.css", "/src", "x")));
        assert!(stage.finish().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_batch_skips_load() {
        // A path that would fail to load is never read for an empty batch.
        let dir = TempDir::new().unwrap();
        let stage = ManifestStage::new(ManifestOptions::from(dir.path().to_path_buf()).with_merge(true));
        assert!(stage.finish().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_merge_with_persisted_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rev-manifest.json");
        fs::write(&path, r#"{"a.css": "a-old.css", "b.js": "b-1.js"}"#).unwrap();

        let mut stage = ManifestStage::new(ManifestOptions::from(path.clone()).with_merge(true));
        stage.push(&renamed("/src/a.css", "/src", "x"));

        let record = stage.finish().await.unwrap().unwrap();
        let merged: Manifest = serde_json::from_str(text(&record)).unwrap();
        assert_eq!(merged["a.css"], format!("a-{}.css", hash::digest("x")));
        assert_eq!(merged["b.js"], "b-1.js");
    }

    #[tokio::test]
    async fn test_persisted_manifest_ignored_without_merge() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rev-manifest.json");
        fs::write(&path, r#"{"b.js": "b-1.js"}"#).unwrap();

        let mut stage = ManifestStage::new(path);
        stage.push(&renamed("/src/a.css", "/src", "x"));

        let record = stage.finish().await.unwrap().unwrap();
        assert!(!text(&record).contains("b.js"));
    }

    #[tokio::test]
    async fn test_unreadable_manifest_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut stage = ManifestStage::new(dir.path().to_path_buf());
        stage.push(&renamed("/src/a.css", "/src", "x"));
        assert!(stage.finish().await.is_err());
    }

    #[tokio::test]
    async fn test_keys_sorted_regardless_of_order() {
        let dir = TempDir::new().unwrap();
        let mut stage = ManifestStage::new(dir.path().join("rev-manifest.json"));
        stage.push(&renamed("/src/z.js", "/src", "z"));
        stage.push(&renamed("/src/a.css", "/src", "a"));

        let record = stage.finish().await.unwrap().unwrap();
        let body = text(&record);
        assert!(body.find("a.css").unwrap() < body.find("z.js").unwrap());
    }

    #[tokio::test]
    async fn test_toml_format() {
        let dir = TempDir::new().unwrap();
        let options = ManifestOptions::from(dir.path().join("rev-manifest.toml"))
            .with_format(ManifestFormat::Toml);
        let mut stage = ManifestStage::new(options);
        stage.push(&renamed("/src/a.css", "/src", "x"));

        let record = stage.finish().await.unwrap().unwrap();
        let parsed = TomlTransformer.parse(text(&record)).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_merge_stage_uses_caller_accumulator() {
        let mut acc = ManifestAccumulator::new();
        {
            let mut stage = ManifestMergeStage::new(&mut acc);
            stage.collect(&renamed("/src/a.css", "/src", "x"));
            stage.collect(&FileRecord::new("/src/plain.txt", "/src", "p"));

            let persisted = FileRecord::new(
                "rev-manifest.json",
                "",
                r#"{"a.css": "a-old.css", "d.js": "d-1.js"}"#,
            );
            let merged = stage.merge(persisted).unwrap();
            let parsed: Manifest = serde_json::from_str(text(&merged)).unwrap();
            assert_eq!(parsed["a.css"], format!("a-{}.css", hash::digest("x")));
            assert_eq!(parsed["d.js"], "d-1.js");
        }
        // Merged state is kept for the next invocation.
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_merge_stage_null_manifest_record() {
        let mut acc = ManifestAccumulator::new();
        let mut stage = ManifestMergeStage::new(&mut acc);
        stage.collect(&renamed("/src/a.css", "/src", "x"));

        let merged = stage.merge(FileRecord::null("rev-manifest.json", "")).unwrap();
        assert!(text(&merged).contains("a.css"));
    }
}
