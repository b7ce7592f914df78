//! Path utilities for revisioning.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! Manifest keys and values always use forward slashes regardless of the
//! platform separator.

use std::path::{Component, Path, PathBuf};

/// Sourcemap extension (without the dot).
pub const MAP_EXT: &str = "map";

/// Render a path with forward slashes.
#[inline]
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolve `.` and `..` components without touching the file system.
///
/// `..` at the root stays at the root; leading `..` of a relative path is kept.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Path of `path` relative to `base`, forward slashes, no leading slash.
///
/// Paths outside `base` are returned whole.
///
/// # Example
/// ```ignore
/// assert_eq!(rel_path(Path::new("/src"), Path::new("/src/css/a.css")), "css/a.css");
/// ```
pub fn rel_path(base: &Path, path: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) => {
            let rel = to_slash(rel);
            rel.strip_prefix('/').map(str::to_owned).unwrap_or(rel)
        }
        Err(_) => to_slash(path),
    }
}

/// Split a file name at its first dot: `app.min.js` → (`app`, `.min.js`).
///
/// Names without a dot return an empty remainder.
#[inline]
pub fn split_filename(name: &str) -> (&str, &str) {
    match name.find('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Insert `-<hash>` after the pre-dot segment of a file name.
///
/// `app.min.js` → `app-<hash>.min.js`, `app` → `app-<hash>`.
pub fn revision_filename(name: &str, hash: &str) -> String {
    let (stem, rest) = split_filename(name);
    format!("{stem}-{hash}{rest}")
}

/// Apply [`revision_filename`] to the last component of a path.
pub fn revision_path(path: &Path, hash: &str) -> PathBuf {
    match path.file_name() {
        Some(name) => path.with_file_name(revision_filename(&name.to_string_lossy(), hash)),
        None => path.to_path_buf(),
    }
}

/// Whether the path has a `.map` extension.
#[inline]
pub fn is_sourcemap(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == MAP_EXT)
}

/// Strip a trailing `.map` from the file name: `app.js.map` → `app.js`.
pub fn strip_map(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stripped = name.strip_suffix(".map")?;
    Some(path.with_file_name(stripped))
}

/// File name of a path as a string (empty if none).
#[inline]
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Directory part of a forward-slash path (`""` when there is none).
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Join a forward-slash directory and a file name.
pub fn join_slash(dir: &str, name: &str) -> String {
    match dir {
        "" | "." => name.to_owned(),
        d if d.ends_with('/') => format!("{d}{name}"),
        d => format!("{d}/{name}"),
    }
}
