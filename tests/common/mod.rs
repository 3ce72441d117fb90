//! Common test utilities for assetpack integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use assert_cmd::Command;
use tempfile::TempDir;

/// A test project: `assetpack.yaml` plus `Assets/BundleRes/`
pub struct TestProject {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to project root
    pub path: PathBuf,
}

impl TestProject {
    /// Create a project at `version` with the given groups
    pub fn new(version: &str, groups: &[&str]) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let project = Self { temp, path };

        let mut yaml = format!("version: {version}\ngroups:\n");
        for group in groups {
            yaml.push_str(&format!("- name: {group}\n"));
        }
        project.write_file("assetpack.yaml", &yaml);
        std::fs::create_dir_all(project.path.join("Assets/BundleRes"))
            .expect("Failed to create resource root");
        project
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Write an asset relative to the resource root
    pub fn write_asset(&self, rel: &str, content: &str) {
        self.write_file(&format!("Assets/BundleRes/{rel}"), content);
    }

    /// Write an asset dated ten seconds into the future, so it is newer than any prior build
    pub fn write_newer_asset(&self, rel: &str, content: &str) {
        self.write_asset(rel, content);
        let file = std::fs::File::options()
            .write(true)
            .open(self.path.join("Assets/BundleRes").join(rel))
            .expect("Failed to open asset");
        file.set_modified(SystemTime::now() + Duration::from_secs(10))
            .expect("Failed to set mtime");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    pub fn read_bytes(&self, path: &str) -> Vec<u8> {
        std::fs::read(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// The store as parsed YAML
    pub fn store(&self) -> serde_yaml::Value {
        serde_yaml::from_str(&self.read_file("assetpack.yaml")).expect("Failed to parse store")
    }

    /// Command running in the project directory
    pub fn cmd(&self) -> Command {
        assetpack_cmd_in(&self.path)
    }
}

/// assetpack binary with a clean environment, running in `dir`
#[allow(deprecated)]
pub fn assetpack_cmd_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("assetpack").expect("Failed to find assetpack binary");
    cmd.current_dir(dir)
        .env_remove("ASSETPACK_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// The `checksum` recorded for `bundle` in a parsed store
pub fn checksum_of(store: &serde_yaml::Value, bundle: &str) -> Option<String> {
    store["groups"]
        .as_sequence()?
        .iter()
        .flat_map(|g| g["bundles"].as_sequence().into_iter().flatten())
        .find(|b| b["name"].as_str() == Some(bundle))?["checksum"]
        .as_str()
        .map(str::to_string)
}
