use std::fmt::Debug;
use std::path::PathBuf;

use crate::error::Result;
use crate::resource::error::ResourceError;
use crate::resource::manager::ResourceManager;

/// Maps a key to the physical address the storage manager reads and writes.
///
/// Resolution is a pure function of the descriptor the resource manager
/// currently holds for the key.
pub trait ResourceResolver: Send + Sync + Debug {
    fn resolve(&self, key: &str, manager: &dyn ResourceManager) -> Result<String>;
}

/// `<base_path>/<key>.<format>`, the format being the descriptor's or the
/// default one
#[derive(Debug, Clone)]
pub struct BasePathResolver {
    base_path: PathBuf,
    default_format: String,
}

impl BasePathResolver {
    pub fn new(base_path: impl Into<PathBuf>, default_format: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            default_format: default_format.into(),
        }
    }
}

impl ResourceResolver for BasePathResolver {
    fn resolve(&self, key: &str, manager: &dyn ResourceManager) -> Result<String> {
        let descriptor = manager.resource(key)?;
        let file_name = format!("{}.{}", key, descriptor.format_or(&self.default_format));
        Ok(self.base_path.join(file_name).to_string_lossy().into_owned())
    }
}

/// The `path` stored in the descriptor
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredPathResolver;

impl ResourceResolver for ConfiguredPathResolver {
    fn resolve(&self, key: &str, manager: &dyn ResourceManager) -> Result<String> {
        manager.resource(key)?.path.ok_or_else(|| {
            ResourceError::InvalidDescriptor {
                key: key.to_string(),
                reason: "no 'path' declared".to_string(),
            }
            .into()
        })
    }
}
