use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Filesystem handle of the storage technologies.
///
/// Both technologies, the configuration loader and the base path scan go
/// through a provider, so a backend never touches the disk directly. Write
/// operations create missing parent directories.
pub trait StorageProvider: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    fn read_to_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        self.write_bytes(path, contents.as_bytes())
    }

    /// Replace the file at `path` with `contents`
    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Entries of a directory, sorted
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Remove whatever is stored at `path`, file or directory tree.
    /// Returns whether something was removed.
    fn remove_all(&self, path: &Path) -> Result<bool> {
        if self.is_dir(path) {
            self.remove_dir_all(path)?;
        } else if self.exists(path) {
            self.remove_file(path)?;
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}
