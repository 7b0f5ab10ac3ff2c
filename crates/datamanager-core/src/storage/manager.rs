use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;

use crate::dataset::{Dataset, DatasetConverter, DatasetKind};
use crate::error::Result;
use crate::format::{FormatRegistry, Options, TableFormat};
use crate::logging::Logger;
use crate::resource::{DataContext, ResourceDescriptor, ResourceError, ResourceManager, ResourceResolver};
use crate::storage::error::StorageSystemError;

/// The parts of a backend a storage manager needs to reach a key: the
/// descriptor bookkeeping, the address resolution and, on save, the dataset
/// converter.
#[derive(Debug, Clone, Copy)]
pub struct ResourceAccess<'a> {
    pub manager: &'a dyn ResourceManager,
    pub resolver: &'a dyn ResourceResolver,
    pub converter: &'a DatasetConverter,
}

impl<'a> ResourceAccess<'a> {
    pub fn new(
        manager: &'a dyn ResourceManager,
        resolver: &'a dyn ResourceResolver,
        converter: &'a DatasetConverter,
    ) -> Self {
        Self {
            manager,
            resolver,
            converter,
        }
    }

    pub fn descriptor(&self, key: &str) -> Result<ResourceDescriptor> {
        self.manager.resource(key)
    }

    /// Physical address of a key
    pub fn address(&self, key: &str) -> Result<String> {
        self.resolver.resolve(key, self.manager)
    }
}

/// Options of a single save call
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOptions {
    /// Replace an existing dataset (default true)
    pub overwrite: bool,
    /// Columns to partition the stored dataset by, where the storage supports it
    pub partition_by: Vec<String>,
    /// Writer options layered over the descriptor's `save_options`
    pub options: Options,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn partition_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partition_by = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.set(key, value);
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            partition_by: Vec::new(),
            options: Options::new(),
        }
    }
}

/// Performs the physical I/O of one storage technology.
///
/// Every operation addresses the key through the [`ResourceAccess`] of the
/// backend it is composed into.
pub trait StorageManager: Send + Sync + Debug {
    /// Short name of the storage technology
    fn name(&self) -> &str;

    /// The dataset representation this storage reads and writes
    fn native_kind(&self) -> DatasetKind;

    /// Whether the resolved address exists in the store
    fn exists(&self, key: &str, access: &ResourceAccess<'_>) -> Result<bool>;

    /// Read a dataset. `options` override the descriptor's reader options.
    fn load(&self, key: &str, access: &ResourceAccess<'_>, options: &Options) -> Result<Dataset>;

    /// Write a dataset, returning whether the address exists afterwards
    fn save(&self, key: &str, dataset: Dataset, access: &ResourceAccess<'_>, options: &SaveOptions) -> Result<bool>;

    /// Remove a dataset, returning whether the address is gone afterwards
    fn delete(&self, key: &str, access: &ResourceAccess<'_>) -> Result<bool>;
}

/// What a read or write needs once the key has been checked and resolved
pub(crate) struct IoPlan {
    pub address: String,
    pub format: Arc<dyn TableFormat>,
    pub options: Options,
}

/// Existence check shared by the storage managers: undeclared keys are only
/// logged, resolution decides whether they can be addressed at all
pub(crate) fn resolve_for_exists(key: &str, access: &ResourceAccess<'_>, logger: &Logger) -> Result<String> {
    if !access.manager.has(key, None) {
        logger.debug(format!("Dataset '{}' is not defined in the resource manager", key));
    }
    access.address(key)
}

pub(crate) fn plan_read(
    key: &str,
    access: &ResourceAccess<'_>,
    formats: &FormatRegistry,
    default_format: &str,
    overrides: &Options,
) -> Result<IoPlan> {
    if !access.manager.has(key, Some(DataContext::Read)) {
        return Err(ResourceError::not_found(key).into());
    }

    let descriptor = access.descriptor(key)?;
    let format = formats.get(descriptor.format_or(default_format))?;
    let address = access.address(key)?;

    Ok(IoPlan {
        address,
        format,
        options: descriptor.options.merged(overrides),
    })
}

/// Checks run before any write, in order: existing target without overwrite,
/// read-only descriptor, unknown format
pub(crate) fn plan_write(
    key: &str,
    access: &ResourceAccess<'_>,
    formats: &FormatRegistry,
    default_format: &str,
    options: &SaveOptions,
    target_exists: impl FnOnce(&str) -> bool,
) -> Result<IoPlan> {
    let address = access.address(key)?;
    if !options.overwrite && target_exists(&address) {
        return Err(StorageSystemError::ResourceExists {
            key: key.to_string(),
            path: address,
        }
        .into());
    }

    let descriptor = access.descriptor(key)?;
    check_writable(key, &descriptor, "save")?;

    let format = formats.get(descriptor.format_or(default_format))?;

    Ok(IoPlan {
        address,
        format,
        options: descriptor.save_options.merged(&options.options),
    })
}

pub(crate) fn check_writable(key: &str, descriptor: &ResourceDescriptor, operation: &str) -> Result<()> {
    if descriptor.read_only {
        return Err(StorageSystemError::ReadOnly {
            key: key.to_string(),
            operation: operation.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Convert a dataset to the storage's native kind
pub(crate) fn convert_native(dataset: Dataset, kind: DatasetKind, converter: &DatasetConverter) -> Result<Dataset> {
    let converted = converter.convert(dataset, kind)?;
    if converted.kind() != kind {
        return Err(crate::dataset::DatasetError::ConversionFailed {
            from: converted.kind(),
            to: kind,
            message: "converter returned a dataset of the wrong kind".to_string(),
        }
        .into());
    }
    Ok(converted)
}
