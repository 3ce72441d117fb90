//! File system errors

use std::path::Path;

use super::PackError;

/// Creates a file not found error
pub fn not_found(path: impl Into<String>) -> PackError {
    PackError::FileNotFound { path: path.into() }
}

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> PackError {
    PackError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> PackError {
    PackError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// `map_err` adapter for reads of `path`
pub fn read_err(path: &Path) -> impl FnOnce(std::io::Error) -> PackError + '_ {
    move |e| read_failed(path.display().to_string(), e.to_string())
}

/// `map_err` adapter for writes of `path`
pub fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> PackError + '_ {
    move |e| write_failed(path.display().to_string(), e.to_string())
}
