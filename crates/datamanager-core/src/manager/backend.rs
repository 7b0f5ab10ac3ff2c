use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ConfigTree;
use crate::constants::{
    DEFAULT_FILE_TYPE, HDFS_BASE_PATH_ID, HDFS_CONFIGURED_ID, HDFS_CONFIG_ROOT, LOCAL_BASE_PATH_ID,
    LOCAL_CONFIGURED_ID, LOCAL_CONFIG_ROOT,
};
use crate::dataset::{Dataset, DatasetConverter};
use crate::error::Result;
use crate::format::{FormatRegistry, Options};
use crate::logging::Logger;
use crate::manager::traits::DataManager;
use crate::resource::{
    BasePathResolver, BasePathResourceManager, ConfiguredPathResolver, ConfiguredResourceManager, DataContext,
    ResourceDescriptor, ResourceManager, ResourceResolver,
};
use crate::storage::{
    LocalStorageProvider, PartitionedStorageManager, ResourceAccess, SaveOptions, Session, StorageManager,
    StorageProvider, TableStorageManager,
};

/// Construction options shared by the backend constructors
#[derive(Debug, Clone)]
pub struct BackendOptions {
    /// Format used when a descriptor declares none
    pub default_format: String,
    /// Converter used on save; each constructor picks a default when unset
    pub converter: Option<Arc<DatasetConverter>>,
    /// Formats of the local backends (partitioned backends use the session's)
    pub formats: Arc<FormatRegistry>,
    /// Filesystem of the local backends (partitioned backends use the session's)
    pub provider: Arc<dyn StorageProvider>,
}

impl BackendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_format(mut self, format: impl Into<String>) -> Self {
        self.default_format = format.into();
        self
    }

    pub fn with_converter(mut self, converter: Arc<DatasetConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_formats(mut self, formats: Arc<FormatRegistry>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn StorageProvider>) -> Self {
        self.provider = provider;
        self
    }

    fn converter_or(&self, parallelism: usize) -> Arc<DatasetConverter> {
        self.converter
            .clone()
            .unwrap_or_else(|| Arc::new(DatasetConverter::with_parallelism(parallelism)))
    }
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            default_format: DEFAULT_FILE_TYPE.to_string(),
            converter: None,
            formats: Arc::new(FormatRegistry::with_defaults()),
            provider: Arc::new(LocalStorageProvider::default()),
        }
    }
}

/// A data manager composed of its three roles and a converter.
///
/// Every operation is delegated: descriptor bookkeeping to the
/// [`ResourceManager`], addressing to the [`ResourceResolver`], I/O to the
/// [`StorageManager`]. Backends that track their resources (the base path
/// ones) record a key after a successful save and forget it after a
/// successful delete.
pub struct Backend {
    id: String,
    resolver: Box<dyn ResourceResolver>,
    resources: Box<dyn ResourceManager>,
    storage: Box<dyn StorageManager>,
    converter: Arc<DatasetConverter>,
    tracks_resources: bool,
    logger: Logger,
}

impl Backend {
    pub fn new(
        id: impl Into<String>,
        resolver: Box<dyn ResourceResolver>,
        resources: Box<dyn ResourceManager>,
        storage: Box<dyn StorageManager>,
        converter: Arc<DatasetConverter>,
    ) -> Self {
        let id = id.into();
        let logger = Logger::component("backend").child(&id);
        Self {
            id,
            resolver,
            resources,
            storage,
            converter,
            tracks_resources: false,
            logger,
        }
    }

    /// Keep the resource manager in sync with successful saves and deletes
    pub fn tracking_resources(mut self, tracks: bool) -> Self {
        self.tracks_resources = tracks;
        self
    }

    /// Local directory of one file per key
    pub fn local_base_path(base_path: impl Into<PathBuf>, options: BackendOptions) -> Result<Self> {
        let base_path = base_path.into();
        let logger = Logger::component("backend").child(LOCAL_BASE_PATH_ID);
        let resources = BasePathResourceManager::new(
            &base_path,
            &options.default_format,
            options.provider.as_ref(),
            logger.child("resources"),
        )?;
        let storage = TableStorageManager::new(
            options.provider.clone(),
            options.formats.clone(),
            &options.default_format,
            logger.child("storage"),
        );

        Ok(Self::new(
            LOCAL_BASE_PATH_ID,
            Box::new(BasePathResolver::new(base_path, &options.default_format)),
            Box::new(resources),
            Box::new(storage),
            options.converter_or(1),
        )
        .tracking_resources(true))
    }

    /// Local files declared under `data.local` in the configuration
    pub fn local_configured(config: &ConfigTree, options: BackendOptions) -> Result<Self> {
        let logger = Logger::component("backend").child(LOCAL_CONFIGURED_ID);
        let resources = ConfiguredResourceManager::with_root(config, LOCAL_CONFIG_ROOT, logger.child("resources"))?;
        let storage = TableStorageManager::new(
            options.provider.clone(),
            options.formats.clone(),
            &options.default_format,
            logger.child("storage"),
        );

        Ok(Self::new(
            LOCAL_CONFIGURED_ID,
            Box::new(ConfiguredPathResolver),
            Box::new(resources),
            Box::new(storage),
            options.converter_or(1),
        ))
    }

    /// Partitioned directory of one dataset per key
    pub fn hdfs_base_path(base_path: impl Into<PathBuf>, session: Arc<Session>, options: BackendOptions) -> Result<Self> {
        let base_path = base_path.into();
        let logger = Logger::component("backend").child(HDFS_BASE_PATH_ID);
        let resources = BasePathResourceManager::new(
            &base_path,
            &options.default_format,
            session.provider().as_ref(),
            logger.child("resources"),
        )?;
        let converter = options.converter_or(session.parallelism());
        let storage = PartitionedStorageManager::new(session, &options.default_format, logger.child("storage"));

        Ok(Self::new(
            HDFS_BASE_PATH_ID,
            Box::new(BasePathResolver::new(base_path, &options.default_format)),
            Box::new(resources),
            Box::new(storage),
            converter,
        )
        .tracking_resources(true))
    }

    /// Partitioned datasets declared under `data.hdfs` in the configuration
    pub fn hdfs_configured(config: &ConfigTree, session: Arc<Session>, options: BackendOptions) -> Result<Self> {
        let logger = Logger::component("backend").child(HDFS_CONFIGURED_ID);
        let resources = ConfiguredResourceManager::with_root(config, HDFS_CONFIG_ROOT, logger.child("resources"))?;
        let converter = options.converter_or(session.parallelism());
        let storage = PartitionedStorageManager::new(session, &options.default_format, logger.child("storage"));

        Ok(Self::new(
            HDFS_CONFIGURED_ID,
            Box::new(ConfiguredPathResolver),
            Box::new(resources),
            Box::new(storage),
            converter,
        ))
    }

    pub fn converter(&self) -> &Arc<DatasetConverter> {
        &self.converter
    }

    /// Name of the storage technology behind this backend
    pub fn storage_name(&self) -> &str {
        self.storage.name()
    }

    fn access(&self) -> ResourceAccess<'_> {
        ResourceAccess::new(self.resources.as_ref(), self.resolver.as_ref(), &self.converter)
    }
}

impl DataManager for Backend {
    fn id(&self) -> &str {
        &self.id
    }

    fn resources(&self) -> BTreeMap<String, ResourceDescriptor> {
        self.resources.resources()
    }

    fn resource(&self, key: &str) -> Result<ResourceDescriptor> {
        self.resources.resource(key)
    }

    fn has(&self, key: &str, context: Option<DataContext>) -> bool {
        self.resources.has(key, context)
    }

    fn add(&mut self, key: &str, descriptor: ResourceDescriptor) -> Result<()> {
        self.resources.add(key, descriptor)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.resources.remove(key)
    }

    fn resolve(&self, key: &str) -> Result<String> {
        self.resolver.resolve(key, self.resources.as_ref())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.storage.exists(key, &self.access())
    }

    fn load(&self, key: &str, options: &Options) -> Result<Dataset> {
        self.storage.load(key, &self.access(), options)
    }

    fn save(&mut self, key: &str, dataset: Dataset, options: &SaveOptions) -> Result<bool> {
        let saved = self.storage.save(key, dataset, &self.access(), options)?;
        if saved && self.tracks_resources {
            let descriptor = self.resources.resource(key)?;
            self.resources.add(key, descriptor)?;
        }
        self.logger.debug(format!("Saved dataset '{}': {}", key, saved));
        Ok(saved)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        let deleted = self.storage.delete(key, &self.access())?;
        if deleted && self.tracks_resources {
            self.resources.remove(key)?;
        }
        self.logger.debug(format!("Deleted dataset '{}': {}", key, deleted));
        Ok(deleted)
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("id", &self.id)
            .field("resolver", &self.resolver)
            .field("resources", &self.resources)
            .field("storage", &self.storage.name())
            .field("tracks_resources", &self.tracks_resources)
            .finish()
    }
}
