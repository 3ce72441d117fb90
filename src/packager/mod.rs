//! Packaging primitive
//!
//! The builder treats packaging as a black box: it hands over the output
//! directory and one request per dirty bundle, and gets back the content
//! hash of every artifact written. [`TarPackager`] is the built-in
//! implementation; hosts with their own bundle format implement
//! [`Packager`] instead.

pub mod manifest;
pub mod tar;

use std::path::Path;

use crate::detect::AssetFile;
use crate::error::Result;
use crate::platform::Platform;

pub use self::manifest::{PackManifest, PriorSnapshot};
pub use self::tar::TarPackager;

/// One bundle to produce
#[derive(Debug, Clone)]
pub struct BundleBuild {
    /// Relative key, e.g. `UI/icons.bundle`; the artifact is written to `<out_dir>/<name>`
    pub name: String,
    /// Assets packed into the bundle
    pub assets: Vec<AssetFile>,
}

/// Produces bundle artifacts for one group
pub trait Packager {
    /// Write one artifact per request under `out_dir` and return their content hashes
    fn package(
        &self,
        out_dir: &Path,
        requests: &[BundleBuild],
        platform: Platform,
    ) -> Result<PackManifest>;
}
