use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::Result;
use crate::resource::descriptor::{DataContext, ResourceDescriptor};
use crate::resource::error::ResourceError;

/// Owns the key → descriptor association of one backend.
///
/// `has` decides whether the backend is eligible to serve a key for a given
/// purpose; it never touches the physical store.
pub trait ResourceManager: Send + Sync + Debug {
    /// Short name used in error messages
    fn name(&self) -> &str;

    /// Snapshot of every known descriptor
    fn resources(&self) -> BTreeMap<String, ResourceDescriptor>;

    /// Descriptor of a key
    fn resource(&self, key: &str) -> Result<ResourceDescriptor>;

    /// Whether this manager can serve `key` for the given purpose
    fn has(&self, key: &str, context: Option<DataContext>) -> bool;

    /// Record a descriptor for a key
    fn add(&mut self, key: &str, descriptor: ResourceDescriptor) -> Result<()> {
        let _ = (key, descriptor);
        Err(ResourceError::UnsupportedOperation {
            operation: "add".to_string(),
            manager: self.name().to_string(),
        }
        .into())
    }

    /// Forget a key
    fn remove(&mut self, key: &str) -> Result<()> {
        let _ = key;
        Err(ResourceError::UnsupportedOperation {
            operation: "remove".to_string(),
            manager: self.name().to_string(),
        }
        .into())
    }
}
