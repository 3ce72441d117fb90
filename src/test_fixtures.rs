//! Test fixtures and utilities for reducing test setup duplication.
//!
//! [`TestProject`] lays out a project directory with an `assetpack.yaml`
//! and a resource root, so a test can go straight to writing assets:
//!
//! ```ignore
//! let project = TestProject::new(&["UI"]);
//! project.write_asset("UI/icons/a.png", "a");
//! let mut config = project.config();
//! let layout = project.layout(&config, Platform::Android);
//! ```

use std::cell::RefCell;
use std::env;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use crate::config::{BundleConfig, CONFIG_FILE};
use crate::error::{Result, packaging_failed};
use crate::layout::Layout;
use crate::packager::{BundleBuild, PackManifest, Packager, TarPackager};
use crate::platform::Platform;

/// Directory for test temp dirs; never relative to the working directory
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        PathBuf::from("/tmp")
    }
}

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(temp_dir_base()).expect("Failed to create temp directory")
}

/// A throwaway project: `assetpack.yaml` plus `Assets/BundleRes/`
pub struct TestProject {
    temp: TempDir,
}

impl TestProject {
    /// Create a project at version 1.0.0 with the given groups
    ///
    /// # Panics
    ///
    /// Panics if the project files cannot be written.
    #[must_use]
    pub fn new(groups: &[&str]) -> Self {
        let temp = create_temp_dir();
        let mut yaml = String::from("version: 1.0.0\ngroups:\n");
        for group in groups {
            yaml.push_str(&format!("- name: {group}\n"));
        }
        std::fs::write(temp.path().join(CONFIG_FILE), yaml).expect("Failed to write config");
        std::fs::create_dir_all(temp.path().join("Assets/BundleRes"))
            .expect("Failed to create resource root");
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join(CONFIG_FILE)
    }

    /// Write an asset relative to the resource root
    pub fn write_asset(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join("Assets/BundleRes").join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create asset dir");
        }
        std::fs::write(&path, content).expect("Failed to write asset");
        path
    }

    /// Write an asset whose modification time lies `ahead` in the future
    ///
    /// File timestamps come from a coarse kernel clock; pushing them forward
    /// makes "modified after the last build" hold regardless of clock skew.
    pub fn write_asset_modified_later(&self, rel: &str, content: &str, ahead: Duration) -> PathBuf {
        let path = self.write_asset(rel, content);
        let file = std::fs::File::options()
            .write(true)
            .open(&path)
            .expect("Failed to open asset");
        file.set_modified(SystemTime::now() + ahead)
            .expect("Failed to set mtime");
        path
    }

    /// Load the project's store from disk
    #[must_use]
    pub fn config(&self) -> BundleConfig {
        BundleConfig::load(&self.config_path()).expect("Failed to load config")
    }

    #[must_use]
    pub fn layout(&self, config: &BundleConfig, platform: Platform) -> Layout {
        Layout::new(config, self.root(), platform)
    }
}

/// Packager that always fails
#[derive(Debug, Default)]
pub struct FailingPackager;

impl Packager for FailingPackager {
    fn package(&self, _out_dir: &Path, _requests: &[BundleBuild], _platform: Platform) -> Result<PackManifest> {
        Err(packaging_failed("test", "packager unavailable"))
    }
}

/// Tar packager that records every request it receives
#[derive(Debug, Default)]
pub struct CountingPackager {
    calls: RefCell<Vec<Vec<String>>>,
}

impl CountingPackager {
    /// Number of `package` calls
    pub fn calls(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Every bundle packaged, in call order
    pub fn packaged(&self) -> Vec<String> {
        self.calls.borrow().iter().flatten().cloned().collect()
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Packager for CountingPackager {
    fn package(&self, out_dir: &Path, requests: &[BundleBuild], platform: Platform) -> Result<PackManifest> {
        self.calls
            .borrow_mut()
            .push(requests.iter().map(|r| r.name.clone()).collect());
        TarPackager.package(out_dir, requests, platform)
    }
}
