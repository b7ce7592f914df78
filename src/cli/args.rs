//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG;
use crate::manifest::ManifestFormat;

/// Revision static assets with content hashes and write a rev manifest
#[derive(Parser, Debug, Clone)]
#[command(name = "tola-rev", version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Directory of assets to revision
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub input: PathBuf,

    /// Output directory for revisioned files (default: dist)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Manifest path, relative to the output directory (default: rev-manifest.json)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Merge with an existing manifest instead of replacing it
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub merge: Option<bool>,

    /// Manifest format
    #[arg(short, long, value_enum)]
    pub format: Option<ManifestFormat>,

    /// Skip manifest generation
    #[arg(long)]
    pub no_manifest: bool,

    /// Config file path
    #[arg(short = 'C', long, default_value = DEFAULT_CONFIG, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}
