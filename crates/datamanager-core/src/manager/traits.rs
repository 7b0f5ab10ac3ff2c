use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::format::Options;
use crate::resource::{DataContext, ResourceDescriptor};
use crate::storage::SaveOptions;

/// The full contract of one backend: key bookkeeping, address resolution and
/// storage I/O behind a stable identifier.
pub trait DataManager: Send + Sync + Debug {
    /// Stable identifier, e.g. `local-base_path`
    fn id(&self) -> &str;

    /// Snapshot of every known descriptor
    fn resources(&self) -> BTreeMap<String, ResourceDescriptor>;

    /// Descriptor of a key
    fn resource(&self, key: &str) -> Result<ResourceDescriptor>;

    /// Whether this backend can serve `key` for the given purpose
    fn has(&self, key: &str, context: Option<DataContext>) -> bool;

    /// Record a descriptor for a key
    fn add(&mut self, key: &str, descriptor: ResourceDescriptor) -> Result<()>;

    /// Forget a key
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Physical address of a key
    fn resolve(&self, key: &str) -> Result<String>;

    /// Whether the key's address exists in the store
    fn exists(&self, key: &str) -> Result<bool>;

    /// Read a dataset; `options` override the descriptor's reader options
    fn load(&self, key: &str, options: &Options) -> Result<Dataset>;

    /// Write a dataset, returning whether it exists afterwards
    fn save(&mut self, key: &str, dataset: Dataset, options: &SaveOptions) -> Result<bool>;

    /// Remove a dataset, returning whether it is gone afterwards
    fn delete(&mut self, key: &str) -> Result<bool>;
}
