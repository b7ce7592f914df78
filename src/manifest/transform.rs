//! Pluggable manifest codecs.
//!
//! A [`Transformer`] turns manifest text into entries and back. JSON is the
//! default; TOML is available for projects that keep their build data in
//! TOML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Manifest;
use crate::debug;
use crate::error::{RevError, RevResult};

/// Manifest codec.
///
/// `stringify` must produce keys in the manifest's (sorted) order.
pub trait Transformer: Send + Sync {
    fn parse(&self, text: &str) -> RevResult<Manifest>;
    fn stringify(&self, manifest: &Manifest) -> RevResult<String>;
}

/// JSON object, two-space indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTransformer;

impl Transformer for JsonTransformer {
    fn parse(&self, text: &str) -> RevResult<Manifest> {
        let table: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(text).map_err(|err| RevError::Transform(err.to_string()))?;
        Ok(string_entries(table, |value: &serde_json::Value| {
            value.as_str().map(str::to_owned)
        }))
    }

    fn stringify(&self, manifest: &Manifest) -> RevResult<String> {
        serde_json::to_string_pretty(manifest).map_err(|err| RevError::Transform(err.to_string()))
    }
}

/// Flat TOML table of quoted keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlTransformer;

impl Transformer for TomlTransformer {
    fn parse(&self, text: &str) -> RevResult<Manifest> {
        let table: BTreeMap<String, toml::Value> =
            toml::from_str(text).map_err(|err| RevError::Transform(err.to_string()))?;
        Ok(string_entries(table, |value: &toml::Value| {
            value.as_str().map(str::to_owned)
        }))
    }

    fn stringify(&self, manifest: &Manifest) -> RevResult<String> {
        toml::to_string(manifest).map_err(|err| RevError::Transform(err.to_string()))
    }
}

/// Keep the string-valued entries of a parsed table, skipping the rest.
fn string_entries<V>(
    table: BTreeMap<String, V>,
    as_string: impl Fn(&V) -> Option<String>,
) -> Manifest {
    let total = table.len();
    let manifest: Manifest = table
        .into_iter()
        .filter_map(|(key, value)| as_string(&value).map(|value| (key, value)))
        .collect();
    if manifest.len() < total {
        debug!("manifest"; "skipped {} non-string entries", total - manifest.len());
    }
    manifest
}

/// Built-in codec selection for config and CLI.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    #[default]
    Json,
    Toml,
}

impl ManifestFormat {
    pub fn transformer(self) -> Box<dyn Transformer> {
        match self {
            Self::Json => Box::new(JsonTransformer),
            Self::Toml => Box::new(TomlTransformer),
        }
    }
}
