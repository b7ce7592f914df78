//! Configuration section definitions.
//!
//! | Section      | Purpose                                   |
//! |--------------|-------------------------------------------|
//! | `[manifest]` | manifest location, merge mode and format  |
//! | `[build]`    | output directory for revisioned files     |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::manifest::{DEFAULT_MANIFEST_PATH, ManifestFormat};

/// `[manifest]` section.
///
/// ```toml
/// [manifest]
/// path = "rev-manifest.json"   # relative to the output directory
/// merge = false
/// format = "json"              # or "toml"
/// enabled = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSection {
    pub path: PathBuf,
    pub merge: bool,
    pub format: ManifestFormat,
    /// Write a manifest at all.
    pub enabled: bool,
}

impl Default for ManifestSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            merge: false,
            format: ManifestFormat::default(),
            enabled: true,
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Output directory (relative to the config file).
    pub output: PathBuf,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
        }
    }
}
