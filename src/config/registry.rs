//! Bundle metadata store (assetpack.yaml)
//!
//! Holds the release version, packaging settings, and every group with its
//! bundle records. The store is loaded once when a command starts, passed
//! down explicitly, and saved once by the manifest generator.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::common::{fs as common_fs, yaml};
use crate::config::group::{BundleGroup, BundleInfo};
use crate::config::settings::PackSettings;
use crate::config::utils::BundleContainer;
use crate::error::{Result, config_not_found, file_read_failed, metadata_corrupt};

/// Default file name of the metadata store
pub const CONFIG_FILE: &str = "assetpack.yaml";

/// The metadata store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Current release version
    pub version: Version,

    /// Packaging settings
    #[serde(default)]
    pub settings: PackSettings,

    /// Ordered group definitions with their bundle records
    #[serde(default)]
    pub groups: Vec<BundleGroup>,
}

impl BundleConfig {
    /// Create an empty store at `version`
    pub fn new(version: Version) -> Self {
        Self {
            version,
            settings: PackSettings::default(),
            groups: Vec::new(),
        }
    }

    /// Load the store from `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(config_not_found(path.display().to_string()));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| file_read_failed(path.display().to_string(), e.to_string()))?;
        Self::from_yaml(&content, path)
    }

    /// Parse the store; `origin` is only used in error messages
    pub fn from_yaml(yaml: &str, origin: &Path) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| metadata_corrupt(origin.display().to_string(), e.to_string()))?;
        config
            .validate()
            .map_err(|reason| metadata_corrupt(origin.display().to_string(), reason))?;
        Ok(config)
    }

    /// Serialize the store to YAML
    pub fn to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(yaml::space_entries(&yaml, Some("groups:")))
    }

    /// Write the store to `path` (copy-then-replace)
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = self.to_yaml()?;
        common_fs::write_atomic(path, yaml.as_bytes())
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let mut names = HashSet::new();
        for group in &self.groups {
            if group.name.trim().is_empty() {
                return Err("group name must not be empty".to_string());
            }
            if group.name.contains('/') || group.name.contains('\\') {
                return Err(format!(
                    "group name '{}' must not contain path separators",
                    group.name
                ));
            }
            if !names.insert(group.name.as_str()) {
                return Err(format!("duplicate group '{}'", group.name));
            }
        }
        Ok(())
    }

    pub fn find_group(&self, name: &str) -> Option<&BundleGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn find_group_mut(&mut self, name: &str) -> Option<&mut BundleGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// Look up a bundle record by its relative key in any group
    pub fn bundle_info(&self, name: &str) -> Option<&BundleInfo> {
        self.groups.iter().find_map(|g| g.find_bundle(name))
    }

    /// Update-or-create the record for `name` in the group owning it
    ///
    /// The owning group is the first path component of the key. Returns
    /// `None` when no such group is configured.
    pub fn upsert_bundle(&mut self, name: &str) -> Option<&mut BundleInfo> {
        let group_name = name.split('/').next()?;
        let group = self.find_group_mut(group_name)?;
        Some(group.bundle_entry(name))
    }

    /// All bundle records in group order
    pub fn all_bundles(&self) -> impl Iterator<Item = (&BundleGroup, &BundleInfo)> {
        self.groups
            .iter()
            .flat_map(|g| g.bundles.iter().map(move |b| (g, b)))
    }
}

/// Resolve the store path from an explicit flag or the working directory
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path,
        None => std::env::current_dir()?.join(CONFIG_FILE),
    };
    if !path.exists() {
        return Err(config_not_found(path.display().to_string()));
    }
    Ok(dunce::canonicalize(&path)?)
}
