//! Common file system operations with unified error handling
//!
//! Every write goes to a temporary file in the destination directory and is
//! then renamed over the target, so a failed write never truncates an
//! existing artifact.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::Result;
use crate::error::fs::{read_err, write_err, write_failed};

/// Create `dir` and its parents if missing
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(write_err(dir))?;
    }
    Ok(())
}

/// Write `bytes` to `path` through a temp file and rename
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = parent_dir(path);
    ensure_dir(parent)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err(path))?;
    tmp.write_all(bytes).map_err(write_err(path))?;
    tmp.as_file().sync_all().map_err(write_err(path))?;
    tmp.persist(path)
        .map_err(|e| write_failed(path.display().to_string(), e.error.to_string()))?;
    Ok(())
}

/// Copy `src` over `dst` without ever leaving a partial `dst` behind
pub fn copy_replace(src: &Path, dst: &Path) -> Result<()> {
    let parent = parent_dir(dst);
    ensure_dir(parent)?;

    let mut input = fs::File::open(src).map_err(read_err(src))?;
    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err(dst))?;
    std::io::copy(&mut input, tmp.as_file_mut()).map_err(write_err(dst))?;
    tmp.persist(dst)
        .map_err(|e| write_failed(dst.display().to_string(), e.error.to_string()))?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
