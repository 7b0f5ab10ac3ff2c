use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::logging::Logger;
use crate::resource::descriptor::{DataContext, ResourceDescriptor};
use crate::resource::manager::ResourceManager;
use crate::storage::StorageProvider;

/// Resource manager over a flat directory.
///
/// Descriptors are discovered by a non-recursive scan of the base path at
/// construction: every entry whose name has an extension (`sales.parquet`,
/// file or directory) becomes key `sales` with format `parquet`. Hidden
/// entries and those starting with `_` are skipped. When two entries share a
/// stem the last one in name order wins, with a warning. Afterwards the set is
/// kept in sync through [`add`](ResourceManager::add) and
/// [`remove`](ResourceManager::remove).
#[derive(Debug, Clone)]
pub struct BasePathResourceManager {
    base_path: PathBuf,
    default_format: String,
    resources: BTreeMap<String, ResourceDescriptor>,
    logger: Logger,
}

impl BasePathResourceManager {
    /// Scan `base_path` through `provider`. A missing directory yields an
    /// empty manager.
    pub fn new(
        base_path: impl Into<PathBuf>,
        default_format: impl Into<String>,
        provider: &dyn StorageProvider,
        logger: Logger,
    ) -> Result<Self> {
        let mut manager = Self::empty(base_path, default_format, logger);
        manager.scan(provider)?;
        Ok(manager)
    }

    /// Manager with no known keys and no scan
    pub fn empty(base_path: impl Into<PathBuf>, default_format: impl Into<String>, logger: Logger) -> Self {
        Self {
            base_path: base_path.into(),
            default_format: default_format.into(),
            resources: BTreeMap::new(),
            logger,
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn default_format(&self) -> &str {
        &self.default_format
    }

    fn scan(&mut self, provider: &dyn StorageProvider) -> Result<()> {
        if !provider.is_dir(&self.base_path) {
            self.logger.debug(format!(
                "Base path '{}' does not exist, starting with no resources",
                self.base_path.display()
            ));
            return Ok(());
        }

        for entry in provider.read_dir(&self.base_path)? {
            let Some(name) = entry.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }
            let (Some(stem), Some(extension)) = (
                entry.file_stem().and_then(|stem| stem.to_str()),
                entry.extension().and_then(|ext| ext.to_str()),
            ) else {
                continue;
            };

            let descriptor = ResourceDescriptor::new()
                .with_path(self.base_path.join(name).to_string_lossy())
                .with_format(extension);
            if let Some(shadowed) = self.resources.insert(stem.to_string(), descriptor) {
                self.logger.warn(format!(
                    "Resource '{}' found more than once under '{}', using '{}' over '{}'",
                    stem,
                    self.base_path.display(),
                    name,
                    shadowed.path.as_deref().unwrap_or("-")
                ));
            }
        }

        self.logger.debug(format!(
            "Discovered {} resource(s) under '{}'",
            self.resources.len(),
            self.base_path.display()
        ));
        Ok(())
    }

    /// Descriptor for a key that has not been seen yet
    fn derived(&self, key: &str) -> ResourceDescriptor {
        let path = self.base_path.join(format!("{}.{}", key, self.default_format));
        ResourceDescriptor::new()
            .with_path(path.to_string_lossy())
            .with_format(self.default_format.clone())
    }
}

impl ResourceManager for BasePathResourceManager {
    fn name(&self) -> &str {
        "base path"
    }

    fn resources(&self) -> BTreeMap<String, ResourceDescriptor> {
        self.resources.clone()
    }

    /// Unknown keys resolve to their derived descriptor, so that new keys are
    /// addressable for writing
    fn resource(&self, key: &str) -> Result<ResourceDescriptor> {
        Ok(self
            .resources
            .get(key)
            .cloned()
            .unwrap_or_else(|| self.derived(key)))
    }

    fn has(&self, key: &str, context: Option<DataContext>) -> bool {
        // Any key can be written into the directory
        context == Some(DataContext::Write) || self.resources.contains_key(key)
    }

    fn add(&mut self, key: &str, descriptor: ResourceDescriptor) -> Result<()> {
        if self.resources.contains_key(key) {
            return Ok(());
        }

        let derived = self.derived(key);
        let descriptor = ResourceDescriptor {
            path: descriptor.path.or(derived.path),
            format: descriptor.format.or(derived.format),
            ..descriptor
        };
        self.logger.debug(format!("Tracking new resource '{}'", key));
        self.resources.insert(key.to_string(), descriptor);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.resources.remove(key).is_some() {
            self.logger.debug(format!("Stopped tracking resource '{}'", key));
        }
        Ok(())
    }
}
