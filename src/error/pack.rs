//! Packaging and compression errors

use super::PackError;

/// Creates a packaging failed error for a whole group
pub fn packaging_failed(group: impl Into<String>, reason: impl Into<String>) -> PackError {
    PackError::PackagingFailed {
        group: group.into(),
        reason: reason.into(),
    }
}

/// Creates a compression failed error for a single bundle
pub fn compression_failed(bundle: impl Into<String>, reason: impl Into<String>) -> PackError {
    PackError::CompressionFailed {
        bundle: bundle.into(),
        reason: reason.into(),
    }
}

/// Creates a cancellation error
pub fn cancelled(group: impl Into<String>) -> PackError {
    PackError::Cancelled {
        group: group.into(),
    }
}
