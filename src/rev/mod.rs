//! Filename revisioning.
//!
//! - [`rename`]: hash a record's bytes and insert the hash into its filename
//! - [`Revisioner`]: per-batch stage that holds sourcemaps back until flush
//!   so they can share their asset's hash

mod name;
mod sourcemap;

pub use name::{apply_hash, rename};
pub use sourcemap::Revisioner;
