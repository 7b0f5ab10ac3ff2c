use std::path::Path;
use std::sync::Arc;

use crate::dataset::{Dataset, DatasetKind};
use crate::error::Result;
use crate::format::{FormatRegistry, Options};
use crate::logging::Logger;
use crate::storage::manager::{
    check_writable, convert_native, plan_read, plan_write, resolve_for_exists, ResourceAccess, SaveOptions,
    StorageManager,
};
use crate::storage::{LocalStorageProvider, StorageProvider};

/// One file per key holding a row-oriented [`Table`](crate::dataset::Table).
///
/// Files are written atomically through the storage provider.
#[derive(Debug, Clone)]
pub struct TableStorageManager {
    provider: Arc<dyn StorageProvider>,
    formats: Arc<FormatRegistry>,
    default_format: String,
    logger: Logger,
}

impl TableStorageManager {
    pub fn new(
        provider: Arc<dyn StorageProvider>,
        formats: Arc<FormatRegistry>,
        default_format: impl Into<String>,
        logger: Logger,
    ) -> Self {
        Self {
            provider,
            formats,
            default_format: default_format.into(),
            logger,
        }
    }

    /// Storage on the local filesystem with the built-in formats
    pub fn local(default_format: impl Into<String>) -> Self {
        Self::new(
            Arc::new(LocalStorageProvider::default()),
            Arc::new(FormatRegistry::with_defaults()),
            default_format,
            Logger::component("storage::table"),
        )
    }

    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }
}

impl StorageManager for TableStorageManager {
    fn name(&self) -> &str {
        "table"
    }

    fn native_kind(&self) -> DatasetKind {
        DatasetKind::Table
    }

    fn exists(&self, key: &str, access: &ResourceAccess<'_>) -> Result<bool> {
        let address = resolve_for_exists(key, access, &self.logger)?;
        Ok(self.provider.is_file(Path::new(&address)))
    }

    fn load(&self, key: &str, access: &ResourceAccess<'_>, options: &Options) -> Result<Dataset> {
        let plan = plan_read(key, access, &self.formats, &self.default_format, options)?;
        self.logger.debug(format!(
            "Reading dataset '{}' from '{}' as {}",
            key,
            plan.address,
            plan.format.name()
        ));

        let bytes = self.provider.read_to_bytes(Path::new(&plan.address))?;
        let table = plan.format.read(&bytes, &plan.options)?;
        Ok(Dataset::Table(table))
    }

    fn save(&self, key: &str, dataset: Dataset, access: &ResourceAccess<'_>, options: &SaveOptions) -> Result<bool> {
        let provider = &self.provider;
        let plan = plan_write(key, access, &self.formats, &self.default_format, options, |address| {
            provider.exists(Path::new(address))
        })?;

        if !options.partition_by.is_empty() {
            self.logger.debug(format!(
                "Ignoring partition columns {:?} for dataset '{}', single-file storage is not partitioned",
                options.partition_by, key
            ));
        }

        let table = match convert_native(dataset, DatasetKind::Table, access.converter)? {
            Dataset::Table(table) => table,
            Dataset::Partitioned(table) => table.into_table(),
        };

        self.logger.debug(format!(
            "Writing dataset '{}' to '{}' as {}",
            key,
            plan.address,
            plan.format.name()
        ));
        let bytes = plan.format.write(&table, &plan.options)?;
        let path = Path::new(&plan.address);
        self.provider.write_bytes(path, &bytes)?;

        Ok(self.provider.is_file(path))
    }

    fn delete(&self, key: &str, access: &ResourceAccess<'_>) -> Result<bool> {
        check_writable(key, &access.descriptor(key)?, "delete")?;

        let address = access.address(key)?;
        let path = Path::new(&address);
        self.logger.debug(format!("Deleting dataset '{}' at '{}'", key, address));
        self.provider.remove_file(path)?;

        Ok(!self.provider.is_file(path))
    }
}
