//! Change detection
//!
//! Decides whether a bundle directory must be repackaged by comparing asset
//! modification times against the bundle's recorded build time.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::config::{BundleInfo, PackSettings};
use crate::error::Result;
use crate::error::fs::read_err;
use crate::path_utils;

/// A source asset that participates in a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the bundle directory, forward slashes
    pub rel_path: String,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

/// Collect every qualifying asset under `dir`, sorted by relative path
pub fn collect_assets(dir: &Path, settings: &PackSettings) -> Result<Vec<AssetFile>> {
    let mut assets = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        if settings.is_excluded(rel) {
            continue;
        }

        let modified = entry
            .metadata()?
            .modified()
            .map_err(read_err(entry.path()))?;
        assets.push(AssetFile {
            path: entry.path().to_path_buf(),
            rel_path: path_utils::to_forward_slashes(rel),
            modified: DateTime::<Utc>::from(modified),
        });
    }

    assets.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(assets)
}

/// Whether the bundle described by `info` must be rebuilt from `assets`
///
/// An empty asset list never triggers a rebuild, not even with `force`.
pub fn needs_rebuild(info: Option<&BundleInfo>, assets: &[AssetFile], force: bool) -> bool {
    if assets.is_empty() {
        return false;
    }
    if force {
        return true;
    }
    match info.and_then(|i| i.build_time) {
        None => true,
        Some(built) => assets.iter().any(|a| a.modified > built),
    }
}

/// Assets modified after the recorded build (all of them if never built)
pub fn changed_assets<'a>(info: Option<&BundleInfo>, assets: &'a [AssetFile]) -> Vec<&'a AssetFile> {
    match info.and_then(|i| i.build_time) {
        None => assets.iter().collect(),
        Some(built) => assets.iter().filter(|a| a.modified > built).collect(),
    }
}
