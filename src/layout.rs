//! Output directory layout
//!
//! ```text
//! <output_root>/<platform>/
//!     manifest.yaml, manifest.yaml.bak, resversion.txt
//!     <group>/<group>                     group index (bundle -> content hash)
//!     <group>/<bundle>                    raw artifact
//!     <group>/<bundle>.lzma               compressed artifact
//!     <version>/<group>/<bundle>.lzma     distribution copy
//!     <version>/manifest.yaml.lzma
//!     <version>/resversion.txt
//! ```

use std::path::{Path, PathBuf};

use crate::config::BundleConfig;
use crate::platform::Platform;

/// Name of the plain-text version marker
pub const VERSION_FILE: &str = "resversion.txt";

/// Suffix of the single-generation manifest backup
pub const BACKUP_SUFFIX: &str = ".bak";

/// Resolved paths for one platform and release version
#[derive(Debug, Clone)]
pub struct Layout {
    pub platform: Platform,
    pub version: String,
    pub resource_root: PathBuf,
    pub platform_root: PathBuf,
    pub version_root: PathBuf,
    compressed_extension: String,
    manifest_name: String,
}

impl Layout {
    /// Resolve the layout; relative settings paths are taken from `project_root`
    pub fn new(config: &BundleConfig, project_root: &Path, platform: Platform) -> Self {
        let settings = &config.settings;
        let version = config.version.to_string();
        let platform_root = project_root
            .join(&settings.output_root)
            .join(platform.target_name());
        Self {
            platform,
            resource_root: project_root.join(&settings.resource_root),
            version_root: platform_root.join(&version),
            platform_root,
            version,
            compressed_extension: settings.compressed_extension.clone(),
            manifest_name: settings.manifest_name.clone(),
        }
    }

    pub fn compressed_extension(&self) -> &str {
        &self.compressed_extension
    }

    /// Raw output directory of a group
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.platform_root.join(group)
    }

    /// Group index written by the packager step
    pub fn group_index_path(&self, group: &str) -> PathBuf {
        self.group_dir(group).join(group)
    }

    /// Raw artifact for a relative key such as `UI/icons.bundle`
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.platform_root.join(name)
    }

    /// Compressed artifact next to the raw one
    pub fn compressed_path(&self, name: &str) -> PathBuf {
        self.platform_root
            .join(format!("{name}{}", self.compressed_extension))
    }

    /// Distribution copy in the version root
    pub fn published_path(&self, name: &str) -> PathBuf {
        self.version_root
            .join(format!("{name}{}", self.compressed_extension))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.platform_root.join(&self.manifest_name)
    }

    pub fn manifest_backup_path(&self) -> PathBuf {
        self.platform_root
            .join(format!("{}{BACKUP_SUFFIX}", self.manifest_name))
    }

    pub fn published_manifest_path(&self) -> PathBuf {
        self.published_path(&self.manifest_name)
    }

    pub fn version_file_path(&self) -> PathBuf {
        self.platform_root.join(VERSION_FILE)
    }

    pub fn published_version_file_path(&self) -> PathBuf {
        self.version_root.join(VERSION_FILE)
    }
}
