//! Content digests for revisioned filenames.
//!
//! Uses blake3 truncated to [`HASH_LEN`] hex characters. The full digest is
//! stable across releases, so persisted manifests stay valid between runs.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let h = hash::digest(b"body {}"); // -> "a1b2c3d4e5"
//! ```

/// Number of hex characters kept from the digest.
pub const HASH_LEN: usize = 10;

/// Compute the short hex digest of byte data.
#[inline]
pub fn digest<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    let hash = blake3::hash(data.as_ref());
    hex::encode(&hash.as_bytes()[..HASH_LEN / 2])
}
