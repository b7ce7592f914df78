//! Revisioning error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the engine.
pub type RevResult<T> = Result<T, RevError>;

/// Errors raised by the revisioning and manifest stages.
///
/// Malformed sourcemap JSON and malformed existing manifests are not errors:
/// they fall back to filename-derived references and an empty manifest.
#[derive(Debug, Error)]
pub enum RevError {
    /// Record contents are a stream; the engine needs the full payload.
    #[error("streaming not supported: `{0}`")]
    Streaming(PathBuf),

    /// Record pushed into a revisioner that has already been flushed.
    #[error("revisioner already flushed, cannot accept `{0}`")]
    Finished(PathBuf),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] io::Error),

    /// Manifest codec failed to serialize or parse.
    #[error("manifest transform failed: {0}")]
    Transform(String),
}

impl RevError {
    /// Whether this error is a usage error (wrong kind of input) rather than I/O.
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Streaming(_) | Self::Finished(_))
    }
}

/// Process exit code for a failed run: 2 for usage errors, 1 otherwise.
///
/// The whole context chain is searched, so wrapped engine errors still count.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let usage = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<RevError>())
        .is_some_and(RevError::is_usage);
    if usage { 2 } else { 1 }
}
