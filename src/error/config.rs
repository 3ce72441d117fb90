//! Configuration and metadata store errors

use super::PackError;

/// Creates a config not found error
pub fn not_found(path: impl Into<String>) -> PackError {
    PackError::ConfigNotFound { path: path.into() }
}

/// Creates a metadata corruption error
pub fn metadata_corrupt(path: impl Into<String>, reason: impl Into<String>) -> PackError {
    PackError::MetadataCorrupt {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a group not found error
pub fn group_not_found(name: impl Into<String>) -> PackError {
    PackError::GroupNotFound { name: name.into() }
}
