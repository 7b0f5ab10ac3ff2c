use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::storage::error::StorageSystemError;
use crate::storage::provider::StorageProvider;

/// Provider over the local filesystem.
///
/// Absolute paths are used as they are; relative ones are joined to the root
/// (the working directory for the default provider). File writes are atomic:
/// the data goes to a temporary file next to the target, which then replaces
/// it, so readers never see a partially written part file.
#[derive(Debug, Clone, Default)]
pub struct LocalStorageProvider {
    root: PathBuf,
}

impl LocalStorageProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// `full_path` as the caller addressed it: relative to the root when it
    /// is under a non-empty root
    fn caller_path(&self, full_path: PathBuf) -> PathBuf {
        if self.root.as_os_str().is_empty() {
            return full_path;
        }
        match full_path.strip_prefix(&self.root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => full_path,
        }
    }
}

/// Directory a file at `target` is written from
fn staging_dir(target: &Path) -> Result<PathBuf> {
    match target.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Some(parent) => Ok(parent.to_path_buf()),
        None => Err(StorageSystemError::OperationFailed {
            operation: "write".to_string(),
            path: Some(target.to_path_buf()),
            message: "path has no parent directory".to_string(),
        }
        .into()),
    }
}

impl StorageProvider for LocalStorageProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn exists(&self, path: &Path) -> bool {
        self.full_path(path).exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.full_path(path).is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.full_path(path).is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = self.full_path(path);
        fs::create_dir_all(&path).map_err(|e| Error::io(e, "create_dir_all", path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.full_path(path);
        fs::read_to_string(&path).map_err(|e| Error::io(e, "read_to_string", path))
    }

    fn read_to_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        let path = self.full_path(path);
        fs::read(&path).map_err(|e| Error::io(e, "read", path))
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let target = self.full_path(path);
        let dir = staging_dir(&target)?;
        fs::create_dir_all(&dir).map_err(|e| Error::io(e, "create_dir_all", dir.clone()))?;

        let mut staged = NamedTempFile::new_in(&dir).map_err(|e| Error::io(e, "stage", dir.clone()))?;
        staged
            .write_all(contents)
            .and_then(|()| staged.flush())
            .map_err(|e| Error::io(e, "write", staged.path().to_path_buf()))?;
        staged
            .persist(&target)
            .map_err(|e| Error::io(e.error, "replace", target.clone()))?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let path = self.full_path(path);
        fs::remove_file(&path).map_err(|e| Error::io(e, "remove_file", path))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let path = self.full_path(path);
        fs::remove_dir_all(&path).map_err(|e| Error::io(e, "remove_dir_all", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let dir = self.full_path(path);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| Error::io(e, "read_dir", dir.clone()))? {
            let entry = entry.map_err(|e| Error::io(e, "read_dir", dir.clone()))?;
            entries.push(self.caller_path(entry.path()));
        }
        entries.sort();
        Ok(entries)
    }
}
