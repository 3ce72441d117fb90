//! Bundle groups and per-bundle records

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::utils::BundleContainer;

/// Per-bundle record kept in the metadata store and listed in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleInfo {
    /// Relative key, e.g. `UI/icons.bundle`
    pub name: String,

    /// Release version that last built this bundle
    #[serde(default)]
    pub version: String,

    /// Time of the last successful build; absent if never built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_time: Option<DateTime<Utc>>,

    /// Byte length of the uncompressed artifact
    #[serde(default)]
    pub size: u64,

    /// Checksum of the uncompressed artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl BundleInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            build_time: None,
            size: 0,
            checksum: None,
        }
    }

    /// Record a successful build. Build time never moves backwards.
    pub fn mark_built(&mut self, at: DateTime<Utc>, version: &str, size: u64) {
        self.build_time = Some(match self.build_time {
            Some(previous) if previous > at => previous,
            _ => at,
        });
        self.version = version.to_string();
        self.size = size;
    }
}

/// A named collection of bundle directories built and versioned together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleGroup {
    /// Group name, also the sub-directory of the resource root
    pub name: String,

    /// Source root override; defaults to `<resource_root>/<name>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Records for every bundle this group has produced
    #[serde(default)]
    pub bundles: Vec<BundleInfo>,
}

impl BundleGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: None,
            bundles: Vec::new(),
        }
    }

    /// Source root of this group, resolved against `resource_root`
    pub fn source_root(&self, resource_root: &Path) -> PathBuf {
        match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => resource_root.join(root),
            None => resource_root.join(&self.name),
        }
    }

    /// Get the record for `name`, appending a fresh one if absent
    pub fn bundle_entry(&mut self, name: &str) -> &mut BundleInfo {
        let index = match self.bundles.iter().position(|b| b.name == name) {
            Some(index) => index,
            None => {
                self.bundles.push(BundleInfo::new(name));
                self.bundles.len() - 1
            }
        };
        &mut self.bundles[index]
    }
}

impl BundleContainer<BundleInfo> for BundleGroup {
    fn bundles(&self) -> &[BundleInfo] {
        &self.bundles
    }

    fn name(bundle: &BundleInfo) -> &str {
        &bundle.name
    }
}
