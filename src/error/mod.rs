//! Error types and handling for assetpack
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`pack`]: Packaging and compression errors
//! - [`config`]: Configuration and metadata store errors
//! - [`fs`]: File system errors

pub mod config;
pub mod fs;
pub mod pack;

#[allow(unused_imports)]
pub use config::{group_not_found, metadata_corrupt, not_found as config_not_found};
#[allow(unused_imports)]
pub use fs::{not_found as file_not_found, read_failed as file_read_failed};
#[allow(unused_imports)]
pub use pack::{cancelled, compression_failed, packaging_failed};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for assetpack operations
#[derive(Error, Diagnostic, Debug)]
pub enum PackError {
    // Packaging errors
    #[error("Packaging failed for group '{group}': {reason}")]
    #[diagnostic(
        code(assetpack::pack::packaging_failed),
        help("The group was skipped; other groups are still processed")
    )]
    PackagingFailed { group: String, reason: String },

    #[error("Compression failed for bundle '{bundle}': {reason}")]
    #[diagnostic(code(assetpack::pack::compression_failed))]
    CompressionFailed { bundle: String, reason: String },

    #[error("Build cancelled before group '{group}' finished")]
    #[diagnostic(code(assetpack::pack::cancelled))]
    Cancelled { group: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(assetpack::config::not_found),
        help("Create assetpack.yaml or pass --config <PATH>")
    )]
    ConfigNotFound { path: String },

    #[error("Bundle metadata is corrupt: {path}: {reason}")]
    #[diagnostic(
        code(assetpack::config::metadata_corrupt),
        help("Fix or restore the file; the last manifest and its .bak copy are left untouched")
    )]
    MetadataCorrupt { path: String, reason: String },

    #[error("Group not found: {name}")]
    #[diagnostic(code(assetpack::config::group_not_found))]
    GroupNotFound { name: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(assetpack::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(assetpack::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(assetpack::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(assetpack::fs::io_error))]
    IoError { message: String },
}

impl PackError {
    /// Whether this error must stop the whole run rather than a single group or bundle
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PackError::MetadataCorrupt { .. } | PackError::ConfigNotFound { .. }
        )
    }
}

impl From<std::io::Error> for PackError {
    fn from(err: std::io::Error) -> Self {
        PackError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for PackError {
    fn from(err: serde_yaml::Error) -> Self {
        PackError::MetadataCorrupt {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PackError {
    fn from(err: serde_json::Error) -> Self {
        PackError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<walkdir::Error> for PackError {
    fn from(err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        PackError::FileReadFailed {
            path,
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, PackError>;
