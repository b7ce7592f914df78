//! tola-rev - content-hash asset revisioning.
//!
//! Renames static assets by inserting a content hash into their filenames
//! and produces a manifest mapping original paths to revisioned paths.
//!
//! # Stages
//!
//! | Stage                     | Input                  | Output                           |
//! |---------------------------|------------------------|----------------------------------|
//! | [`Revisioner`]            | raw [`FileRecord`]s    | renamed records (maps at flush)  |
//! | [`ManifestStage`]         | renamed records        | one manifest record (or nothing) |
//! | [`ManifestMergeStage`]    | renamed + manifest     | manifest merged with accumulator |
//!
//! A host pipeline pushes records one at a time and calls `flush`/`finish`
//! once its input is exhausted.

pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod manifest;
pub mod record;
pub mod rev;
pub mod utils;

pub use error::{RevError, RevResult};
pub use manifest::{
    JsonTransformer, Manifest, ManifestAccumulator, ManifestFormat, ManifestMergeStage,
    ManifestOptions, ManifestStage, TomlTransformer, Transformer,
};
pub use record::{Contents, FileRecord, RevInfo};
pub use rev::{Revisioner, rename};
