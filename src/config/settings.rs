//! Packaging settings (the `settings:` section of assetpack.yaml)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wax::{CandidatePath, Glob, Pattern};

use crate::path_utils;

/// Extensions that never count as bundle assets
pub const DEFAULT_EXCLUDE_EXTENSIONS: &[&str] = &[".tmp", ".bak", ".unity", ".meta", ".DS_Store"];

/// Paths and naming conventions for a packaging run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackSettings {
    /// Directory holding one sub-directory per group
    pub resource_root: PathBuf,

    /// Directory receiving `<platform>/...` output trees
    pub output_root: PathBuf,

    /// Suffix appended to every bundle name (e.g. `.bundle`)
    pub bundle_postfix: String,

    /// Suffix of compressed, distributable files
    pub compressed_extension: String,

    /// File name of the manifest under `<output_root>/<platform>/`
    pub manifest_name: String,

    /// File name suffixes ignored when collecting assets
    pub exclude_extensions: Vec<String>,

    /// Glob patterns (relative to the bundle directory) ignored when collecting assets
    pub exclude_patterns: Vec<String>,
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            resource_root: PathBuf::from("Assets/BundleRes"),
            output_root: PathBuf::from("AssetBundle"),
            bundle_postfix: ".bundle".to_string(),
            compressed_extension: ".lzma".to_string(),
            manifest_name: "manifest.yaml".to_string(),
            exclude_extensions: DEFAULT_EXCLUDE_EXTENSIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl PackSettings {
    /// Whether an asset at `rel_path` (relative to its bundle directory) is ignored
    pub fn is_excluded(&self, rel_path: &Path) -> bool {
        let file_name = rel_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if self
            .exclude_extensions
            .iter()
            .any(|ext| !ext.is_empty() && file_name.ends_with(ext.as_str()))
        {
            return true;
        }

        if self.exclude_patterns.is_empty() {
            return false;
        }

        let normalized = path_utils::to_forward_slashes(rel_path);
        let candidate = CandidatePath::from(normalized.as_str());
        self.exclude_patterns.iter().any(|pattern| {
            Glob::new(pattern)
                .map(|glob| glob.matched(&candidate).is_some())
                .unwrap_or_else(|_| pattern == &normalized)
        })
    }

    /// Whether a file under the output tree is a compressed artifact
    pub fn is_compressed(&self, path: &Path) -> bool {
        path.to_string_lossy()
            .ends_with(self.compressed_extension.as_str())
    }

    /// `path` with the compressed extension appended
    pub fn compressed_path(&self, path: &Path) -> PathBuf {
        let mut os = path.as_os_str().to_os_string();
        os.push(&self.compressed_extension);
        PathBuf::from(os)
    }
}
