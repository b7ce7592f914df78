//! Configuration management for `tola-rev.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section    # [manifest] and [build] definitions
//! ├── error      # ConfigError
//! ├── util       # config file lookup
//! └── mod.rs     # RevConfig (this file)
//! ```
//!
//! The config file is optional. CLI flags override file values.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{BuildSection, ManifestSection};

use crate::{cli::Cli, log, manifest::ManifestOptions};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

/// Default config file name.
pub const DEFAULT_CONFIG: &str = "tola-rev.toml";

/// Root configuration structure representing tola-rev.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevConfig {
    /// Config file the values were read from (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative config paths are resolved against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Manifest settings
    #[serde(default)]
    pub manifest: ManifestSection,

    /// Output settings
    #[serde(default)]
    pub build: BuildSection,
}

impl RevConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file. A missing default config
    /// means defaults; a missing explicitly named config is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = Some(path);
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG) => {
                bail!("Config file '{}' not found", cli.config.display());
            }
            None => Self {
                root: cwd,
                ..Self::default()
            },
        };

        config.normalize_paths();
        config.apply_cli(cli);
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve file-relative paths against the config root.
    fn normalize_paths(&mut self) {
        if self.build.output.is_relative() {
            self.build.output = self.root.join(&self.build.output);
        }
    }

    /// Apply CLI overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(output) = &cli.output {
            self.build.output = output.clone();
        }
        if let Some(path) = &cli.manifest {
            self.manifest.path = path.clone();
        }
        if let Some(merge) = cli.merge {
            self.manifest.merge = merge;
        }
        if let Some(format) = cli.format {
            self.manifest.format = format;
        }
        if cli.no_manifest {
            self.manifest.enabled = false;
        }
    }

    /// Output directory for revisioned files.
    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    /// Manifest location; relative paths live inside the output directory.
    pub fn manifest_path(&self) -> PathBuf {
        if self.manifest.path.is_absolute() {
            self.manifest.path.clone()
        } else {
            self.build.output.join(&self.manifest.path)
        }
    }

    /// Options for the manifest stage.
    pub fn manifest_options(&self) -> ManifestOptions {
        ManifestOptions::from(self.manifest_path())
            .with_merge(self.manifest.merge)
            .with_format(self.manifest.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestFormat;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = RevConfig::from_str("").unwrap();
        assert_eq!(config.manifest.path, PathBuf::from("rev-manifest.json"));
        assert!(!config.manifest.merge);
        assert!(config.manifest.enabled);
        assert_eq!(config.manifest.format, ManifestFormat::Json);
        assert_eq!(config.build.output, PathBuf::from("dist"));
    }

    #[test]
    fn test_parse_sections() {
        let config = RevConfig::from_str(
            r#"
            [manifest]
            path = "assets.toml"
            merge = true
            format = "toml"

            [build]
            output = "public"
            "#,
        )
        .unwrap();
        assert_eq!(config.manifest.path, PathBuf::from("assets.toml"));
        assert!(config.manifest.merge);
        assert_eq!(config.manifest.format, ManifestFormat::Toml);
        assert_eq!(config.build.output, PathBuf::from("public"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = RevConfig::from_str("[manifest\npath = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (config, ignored) = RevConfig::parse_with_ignored(
            r#"
            [manifest]
            merge = true
            mrege = false
            "#,
        )
        .unwrap();
        assert!(config.manifest.merge);
        assert_eq!(ignored, vec!["manifest.mrege".to_string()]);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "tola-rev",
            "assets",
            "--output",
            "out",
            "--merge",
            "--format",
            "toml",
            "--manifest",
            "manifest.toml",
        ]);
        let mut config = RevConfig::default();
        config.apply_cli(&cli);

        assert_eq!(config.output_dir(), Path::new("out"));
        assert!(config.manifest.merge);
        assert_eq!(config.manifest.format, ManifestFormat::Toml);
        assert_eq!(config.manifest_path(), PathBuf::from("out/manifest.toml"));
    }

    #[test]
    fn test_no_manifest_flag() {
        let cli = Cli::parse_from(["tola-rev", "assets", "--no-manifest"]);
        let mut config = RevConfig::default();
        config.apply_cli(&cli);
        assert!(!config.manifest.enabled);
    }

    #[test]
    fn test_manifest_options() {
        let mut config = RevConfig::from_str("[manifest]\nmerge = true").unwrap();
        config.build.output = PathBuf::from("/site/dist");
        let options = config.manifest_options();
        assert_eq!(options.path, PathBuf::from("/site/dist/rev-manifest.json"));
        assert!(options.merge);
    }
}
