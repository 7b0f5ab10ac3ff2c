use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::ConfigTree;
use crate::error::Result;
use crate::logging::Logger;
use crate::resource::descriptor::{DataContext, ResourceDescriptor};
use crate::resource::error::ResourceError;
use crate::resource::manager::ResourceManager;

/// Resource manager over a configuration subtree.
///
/// Every child of the tree is a dataset key whose value is its descriptor.
/// Keys are literal, so a key containing dots is still a single child.
#[derive(Debug, Clone)]
pub struct ConfiguredResourceManager {
    config: ConfigTree,
    logger: Logger,
}

impl ConfiguredResourceManager {
    /// Use the whole tree as the resource table
    pub fn new(config: ConfigTree, logger: Logger) -> Self {
        Self { config, logger }
    }

    /// Use the subtree at the dotted path `root` (e.g. `data.local`)
    pub fn with_root(config: &ConfigTree, root: &str, logger: Logger) -> Result<Self> {
        Ok(Self::new(config.get_tree(root)?, logger))
    }

    /// The resource table, including any changes made through `add`/`remove`
    pub fn config(&self) -> &ConfigTree {
        &self.config
    }
}

/// `read_only` as a boolean, accepting the strings "true"/"false" as well
fn read_only_flag(value: &Value) -> bool {
    match value.get("read_only") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

impl ResourceManager for ConfiguredResourceManager {
    fn name(&self) -> &str {
        "configured"
    }

    fn resources(&self) -> BTreeMap<String, ResourceDescriptor> {
        let mut resources = BTreeMap::new();
        for (key, value) in self.config.iter() {
            match ResourceDescriptor::from_value(key, value) {
                Ok(descriptor) => {
                    resources.insert(key.clone(), descriptor);
                }
                Err(e) => self.logger.warn(format!("Skipping resource '{}': {}", key, e)),
            }
        }
        resources
    }

    fn resource(&self, key: &str) -> Result<ResourceDescriptor> {
        let value = self
            .config
            .child(key)
            .ok_or_else(|| ResourceError::not_found(key))?;
        ResourceDescriptor::from_value(key, value)
    }

    fn has(&self, key: &str, context: Option<DataContext>) -> bool {
        match self.config.child(key) {
            None => false,
            Some(value) => match context {
                None | Some(DataContext::Read) => true,
                Some(DataContext::Write) => !read_only_flag(value),
            },
        }
    }

    fn add(&mut self, key: &str, descriptor: ResourceDescriptor) -> Result<()> {
        self.config.set_child(key, descriptor.to_value());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.config.remove_child(key);
        Ok(())
    }
}
