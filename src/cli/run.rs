//! Directory-to-directory revisioning.
//!
//! Acts as the host pipeline for the CLI: every file under the input
//! directory becomes a [`FileRecord`], flows through the [`Revisioner`] and
//! the [`ManifestStage`], and is written below the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;

use crate::config::RevConfig;
use crate::manifest::ManifestStage;
use crate::record::FileRecord;
use crate::rev::Revisioner;
use crate::utils::path::normalize_lexical;
use crate::{debug, log};

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records written with a hashed filename.
    pub revisioned: usize,
    /// Sourcemaps resolved at flush.
    pub sourcemaps: usize,
    /// Manifest file written, if any.
    pub manifest: Option<PathBuf>,
}

/// Read every file under `input` as a record based at `input`, sorted by path.
///
/// Files below `skip` (typically the output directory) are left out. Both
/// paths are made absolute first, so records carry absolute paths.
pub fn collect_records(input: &Path, skip: &Path) -> Result<Vec<FileRecord>> {
    let input = absolute_path(input)?;
    let skip = absolute_path(skip)?;

    let mut paths: Vec<_> = WalkDir::new(&input)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| !p.starts_with(&skip))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let bytes =
                fs::read(&path).with_context(|| format!("Failed to read `{}`", path.display()))?;
            Ok(FileRecord::new(path, &input, bytes))
        })
        .collect()
}

/// Absolute, lexically normalized form of `path` (cwd-relative if relative).
fn absolute_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve `{}`", path.display()))?;
    Ok(normalize_lexical(&absolute))
}

/// Revision `input` into the configured output directory.
pub async fn run(input: &Path, config: &RevConfig) -> Result<RunSummary> {
    if !input.is_dir() {
        bail!("Input directory '{}' not found", input.display());
    }
    let output = config.output_dir();
    let records = collect_records(input, output)?;
    debug!("rev"; "{} files under {}", records.len(), input.display());

    let mut revisioner = Revisioner::new();
    let mut emitted = Vec::with_capacity(records.len());
    for record in records {
        if let Some(record) = revisioner.push(record)? {
            emitted.push(record);
        }
    }
    let sourcemaps = revisioner.pending();
    emitted.extend(revisioner.flush()?);

    let mut manifest = config
        .manifest
        .enabled
        .then(|| ManifestStage::new(config.manifest_options()));

    for record in &emitted {
        write_record(record, output)?;
        if let Some(stage) = manifest.as_mut() {
            stage.push(record);
        }
    }

    let manifest = match manifest {
        Some(stage) => stage.finish().await?,
        None => None,
    };
    let manifest = match manifest {
        Some(record) => {
            write_bytes(&record.path, record.bytes().unwrap_or_default())?;
            log!("manifest"; "{}", record.path.display());
            Some(record.path)
        }
        None => None,
    };

    Ok(RunSummary {
        revisioned: emitted.iter().filter(|r| r.is_revisioned()).count(),
        sourcemaps,
        manifest,
    })
}

/// Write a record at its base-relative path below `output`.
fn write_record(record: &FileRecord, output: &Path) -> Result<()> {
    let Some(bytes) = record.bytes() else {
        return Ok(());
    };
    let dest = output.join(record.relative());
    debug!("rev"; "write {}", dest.display());
    write_bytes(&dest, bytes)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write `{}`", path.display()))
}
