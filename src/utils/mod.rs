//! Utility modules shared by the revisioning stages.

pub mod hash;
pub mod path;
