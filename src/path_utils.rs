//! Cross-platform path utilities
//!
//! Bundle names are relative paths used as keys in the metadata store and the
//! manifest, so they are always rendered with forward slashes.

use std::path::Path;

/// Convert path to a string with forward slashes
///
/// ```
/// use std::path::Path;
/// use assetpack::path_utils::to_forward_slashes;
///
/// assert_eq!(to_forward_slashes(Path::new("UI\\icons.bundle")), "UI/icons.bundle");
/// ```
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Normalized key of `path` relative to `base`, or `None` if `path` is outside `base`
pub fn relative_key(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let key = to_forward_slashes(rel);
    let key = key.trim_start_matches('/').to_string();
    if key.is_empty() { None } else { Some(key) }
}

/// Metadata key for the bundle built from `<group>/<leaf>`
pub fn bundle_key(group: &str, leaf: &str, postfix: &str) -> String {
    format!("{group}/{leaf}{postfix}")
}

/// Strip a trailing extension such as `.lzma` from a key
pub fn strip_suffix<'a>(key: &'a str, suffix: &str) -> &'a str {
    key.strip_suffix(suffix).unwrap_or(key)
}
