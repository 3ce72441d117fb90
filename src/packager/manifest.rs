//! Group index: bundle name -> content hash
//!
//! Written next to the raw artifacts after every successful packaging call
//! and read back before the next one as the prior snapshot that drives
//! hash-based recompression.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::common::fs as common_fs;
use crate::error::Result;
use crate::error::fs::read_err;
use crate::hash;

/// Content hashes of the bundles produced by a packaging call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackManifest {
    #[serde(default)]
    pub bundles: BTreeMap<String, String>,
}

impl PackManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content hash of `name`, if listed
    pub fn bundle_hash(&self, name: &str) -> Option<&str> {
        self.bundles.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, hash: impl Into<String>) {
        self.bundles.insert(name.into(), hash.into());
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// This manifest with `newer` entries taking precedence
    pub fn merged_with(&self, newer: &PackManifest) -> PackManifest {
        let mut merged = self.clone();
        merged
            .bundles
            .extend(newer.bundles.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the index to `path` (copy-then-replace)
    pub fn save(&self, path: &Path) -> Result<()> {
        common_fs::write_atomic(path, self.to_yaml()?.as_bytes())
    }
}

/// The previous run's group index as seen before packaging
#[derive(Debug, Clone, Default)]
pub struct PriorSnapshot {
    pub manifest: PackManifest,
    /// Hash of the index file itself, `None` if there was no index
    pub index_hash: Option<String>,
}

impl PriorSnapshot {
    /// Read the snapshot at `path`
    ///
    /// A missing index yields an empty snapshot. An unreadable index is
    /// logged and treated as empty, which forces recompression of every
    /// bundle the packager reports.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(path).map_err(read_err(path))?;
        let index_hash = Some(hash::hash_bytes(&bytes));

        match serde_yaml::from_slice::<PackManifest>(&bytes) {
            Ok(manifest) => Ok(Self {
                manifest,
                index_hash,
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable group index");
                Ok(Self {
                    manifest: PackManifest::new(),
                    index_hash,
                })
            }
        }
    }

    /// Prior content hash of `name`
    pub fn hash_of(&self, name: &str) -> Option<&str> {
        self.manifest.bundle_hash(name)
    }
}
