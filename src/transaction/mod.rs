//! Transaction support for manifest generation
//!
//! The metadata store save and the manifest write form one logical unit.
//! Every file the unit may touch is snapshotted first; if the transaction is
//! dropped without being committed, all of them are put back.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new();
//! transaction.backup_file(&config_path)?;
//! transaction.backup_file(&manifest_path)?;
//!
//! // Perform writes...
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::common::fs as common_fs;
use crate::error::Result;
use crate::error::fs::read_err;

/// Snapshot of a file taken before the transaction touched it
#[derive(Debug, Clone)]
struct FileBackup {
    /// Original path
    path: PathBuf,
    /// Original content, `None` if the file did not exist
    content: Option<Vec<u8>>,
}

/// A transaction over a set of files
#[derive(Debug, Default)]
pub struct Transaction {
    /// File backups, in the order they were taken
    backups: Vec<FileBackup>,

    /// Whether the transaction has been committed
    committed: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `path` so a rollback can restore (or remove) it
    pub fn backup_file(&mut self, path: &Path) -> Result<()> {
        if self.backups.iter().any(|b| b.path == path) {
            return Ok(());
        }
        let content = if path.exists() {
            Some(fs::read(path).map_err(read_err(path))?)
        } else {
            None
        };
        self.backups.push(FileBackup {
            path: path.to_path_buf(),
            content,
        });
        Ok(())
    }

    /// Commit the transaction (prevent rollback)
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Manually trigger a rollback
    pub fn rollback(&mut self) {
        if self.committed {
            return;
        }

        for backup in self.backups.iter().rev() {
            let restored = match &backup.content {
                Some(content) => common_fs::write_atomic(&backup.path, content),
                None if backup.path.exists() => fs::remove_file(&backup.path).map_err(Into::into),
                None => Ok(()),
            };
            match restored {
                Ok(()) => debug!(path = %backup.path.display(), "restored"),
                Err(e) => warn!(path = %backup.path.display(), error = %e, "failed to restore"),
            }
        }
        self.committed = true;
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            // Automatic rollback on drop if not committed
            self.rollback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_commit_keeps_changes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("assetpack.yaml");
        fs::write(&path, "version: 1.0.0\n").unwrap();

        let mut transaction = Transaction::new();
        transaction.backup_file(&path).unwrap();
        fs::write(&path, "version: 1.0.1\n").unwrap();
        transaction.commit();

        assert_eq!(fs::read_to_string(&path).unwrap(), "version: 1.0.1\n");
    }

    #[test]
    fn test_drop_restores_modified_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.yaml");
        fs::write(&path, "original").unwrap();

        {
            let mut transaction = Transaction::new();
            transaction.backup_file(&path).unwrap();
            fs::write(&path, "half written").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_drop_removes_created_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("resversion.txt");

        {
            let mut transaction = Transaction::new();
            transaction.backup_file(&path).unwrap();
            fs::write(&path, "1.0.0").unwrap();
        }

        assert!(!path.exists());
    }

    #[test]
    fn test_backup_same_file_twice_keeps_first_snapshot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.yaml");
        fs::write(&path, "first").unwrap();

        {
            let mut transaction = Transaction::new();
            transaction.backup_file(&path).unwrap();
            fs::write(&path, "second").unwrap();
            transaction.backup_file(&path).unwrap();
            fs::write(&path, "third").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "first");
    }
}
