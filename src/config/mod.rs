//! Configuration and metadata store handling for assetpack
//!
//! This module contains data structures for:
//! - `assetpack.yaml` - release version, settings, groups and bundle records
//! - the `settings:` section - paths, suffixes and asset exclusions

pub mod group;
pub mod registry;
pub mod settings;
pub mod utils;

// Re-export commonly used types
pub use group::{BundleGroup, BundleInfo};
pub use registry::{BundleConfig, CONFIG_FILE, resolve_config_path};
pub use settings::PackSettings;
