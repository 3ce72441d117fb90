//! Manifest generation
//!
//! Recomputes the checksum of every published artifact, updates the bundle
//! records, and rewrites the manifest, its compressed copy and both version
//! markers. The writes run inside one [`Transaction`]: either all of them
//! land or the store and manifest are restored to their previous bytes.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::common::{fs as common_fs, yaml};
use crate::compress;
use crate::config::BundleConfig;
use crate::error::fs::read_err;
use crate::error::{PackError, Result};
use crate::hash;
use crate::layout::Layout;
use crate::path_utils;
use crate::transaction::Transaction;

/// Outcome of a manifest generation
#[derive(Debug, Default)]
pub struct ManifestReport {
    /// Bundles whose records were refreshed
    pub recorded: Vec<String>,
    /// Published artifacts that belong to no configured group
    pub unknown: Vec<String>,
    /// Per-entry failures (missing or unreadable raw artifact)
    pub failures: Vec<PackError>,
    pub manifest_path: PathBuf,
    pub published_manifest_path: PathBuf,
}

/// Serialized manifest body: the group list as a top-level sequence
pub fn render_manifest(config: &BundleConfig) -> Result<String> {
    let body = serde_yaml::to_string(&config.groups)?;
    Ok(yaml::space_entries(&body, None))
}

/// Write the plain-text version marker
pub fn write_version_file(path: &Path, version: &str) -> Result<()> {
    common_fs::write_atomic(path, version.as_bytes())
}

/// Bundle keys of every compressed artifact under the version root
fn published_bundles(layout: &Layout) -> Result<Vec<String>> {
    let ext = layout.compressed_extension();
    let manifest = layout.published_manifest_path();
    let mut names = Vec::new();
    if !layout.version_root.is_dir() {
        return Ok(names);
    }

    for entry in WalkDir::new(&layout.version_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.path() == manifest {
            continue;
        }
        let Some(rel) = path_utils::relative_key(&layout.version_root, entry.path()) else {
            continue;
        };
        if !rel.ends_with(ext) {
            continue;
        }
        let name = path_utils::strip_suffix(&rel, ext);
        // group indexes are distributed but are not bundles
        if name.split_once('/').is_some_and(|(group, leaf)| group == leaf) {
            continue;
        }
        names.push(name.to_string());
    }
    Ok(names)
}

/// Checksum and byte length of a raw artifact
fn artifact_facts(raw: &Path) -> Result<(String, u64)> {
    let size = std::fs::metadata(raw).map_err(read_err(raw))?.len();
    Ok((hash::hash_file(raw)?, size))
}

/// Refresh bundle records from the published artifacts and rewrite the manifest
pub fn generate_manifest(
    config: &mut BundleConfig,
    config_path: &Path,
    layout: &Layout,
) -> Result<ManifestReport> {
    let mut report = ManifestReport {
        manifest_path: layout.manifest_path(),
        published_manifest_path: layout.published_manifest_path(),
        ..ManifestReport::default()
    };

    let mut transaction = Transaction::new();
    transaction.backup_file(&report.published_manifest_path)?;
    if report.published_manifest_path.exists() {
        std::fs::remove_file(&report.published_manifest_path)?;
    }

    for name in published_bundles(layout)? {
        let (checksum, size) = match artifact_facts(&layout.artifact_path(&name)) {
            Ok(facts) => facts,
            Err(e) => {
                warn!(bundle = %name, error = %e, "skipping manifest entry");
                report.failures.push(e);
                continue;
            }
        };

        match config.upsert_bundle(&name) {
            Some(info) => {
                debug!(bundle = %name, %checksum, "recorded");
                info.checksum = Some(checksum);
                info.version = layout.version.clone();
                info.size = size;
                report.recorded.push(name);
            }
            None => {
                warn!(bundle = %name, "no configured group owns this bundle");
                report.unknown.push(name);
            }
        }
    }

    let manifest_path = &report.manifest_path;
    let backup_path = layout.manifest_backup_path();
    if manifest_path.exists() {
        transaction.backup_file(&backup_path)?;
        common_fs::copy_replace(manifest_path, &backup_path)?;
    }

    transaction.backup_file(config_path)?;
    config.save(config_path)?;

    transaction.backup_file(manifest_path)?;
    common_fs::write_atomic(manifest_path, render_manifest(config)?.as_bytes())?;

    compress::compress_file(manifest_path, &report.published_manifest_path)?;

    for marker in [
        layout.version_file_path(),
        layout.published_version_file_path(),
    ] {
        transaction.backup_file(&marker)?;
        write_version_file(&marker, &layout.version)?;
    }

    transaction.commit();
    info!(
        platform = %layout.platform,
        version = %layout.version,
        bundles = report.recorded.len(),
        "manifest written"
    );
    Ok(report)
}
