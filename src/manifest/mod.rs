//! Rev manifest: original asset path → revisioned path.
//!
//! # Module Structure
//!
//! ```text
//! manifest/
//! ├── accumulate    # ManifestAccumulator (records → entries)
//! ├── transform     # Transformer codecs (JSON, TOML)
//! ├── merge         # load-or-create, lenient parse, merge, serialize
//! └── stage         # ManifestStage, ManifestMergeStage
//! ```

mod accumulate;
pub mod merge;
mod stage;
mod transform;

use std::collections::BTreeMap;

pub use accumulate::ManifestAccumulator;
pub use stage::{DEFAULT_MANIFEST_PATH, ManifestMergeStage, ManifestOptions, ManifestStage};
pub use transform::{JsonTransformer, ManifestFormat, TomlTransformer, Transformer};

/// Manifest entries, always iterated in lexicographic key order.
pub type Manifest = BTreeMap<String, String>;
