use std::path::Path;

use serde_json::{Map, Value};
#[cfg(feature = "yaml-config")]
use serde_yaml;
#[cfg(feature = "toml-config")]
use toml;

use crate::config::error::ConfigError;
use crate::config::format::ConfigFormat;
use crate::error::Result;
use crate::storage::{LocalStorageProvider, StorageProvider};

/// Nested configuration document.
///
/// The root is always a tree (string-keyed map). Values are addressed either
/// by dotted paths (`data.local.sales.path`) through [`get`](Self::get),
/// [`put`](Self::put) and [`pop`](Self::pop), or by a single literal key
/// through the `*_child` methods, which is what resource managers use since
/// dataset keys may themselves contain dots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigTree {
    root: Map<String, Value>,
}

impl ConfigTree {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self { root: Map::new() }
    }

    /// Create a configuration from a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ConfigError::NotATree { path: "<root>".to_string() }.into()),
        }
    }

    /// Parse a configuration document in the given format
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self> {
        let value: Value = match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| ConfigError::DeserializationError {
                format: format.to_string(),
                source: Box::new(e),
            })?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| ConfigError::DeserializationError {
                format: format.to_string(),
                source: Box::new(e),
            })?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| ConfigError::DeserializationError {
                format: format.to_string(),
                source: Box::new(e),
            })?,
        };

        // An empty YAML document parses as null
        if value.is_null() {
            return Ok(Self::new());
        }

        Self::from_value(value)
    }

    /// Load a configuration file through a storage provider, picking the
    /// format from the file extension
    pub fn load(provider: &dyn StorageProvider, path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedConfigFormat(path.to_path_buf()))?;
        let content = provider.read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Load a configuration file from the local filesystem
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(&LocalStorageProvider::default(), path.as_ref())
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String> {
        let serialized = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(&self.root).map_err(|e| ConfigError::SerializationError {
                format: format.to_string(),
                source: Box::new(e),
            })?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(&self.root).map_err(|e| ConfigError::SerializationError {
                format: format.to_string(),
                source: Box::new(e),
            })?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(&self.root).map_err(|e| ConfigError::SerializationError {
                format: format.to_string(),
                source: Box::new(e),
            })?,
        };
        Ok(serialized)
    }

    /// Get the value at a dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;

        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }

        Some(current)
    }

    /// Get a string value at a dotted path. Numbers and booleans are rendered
    /// as strings; other values yield `None`.
    pub fn get_string(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Get a boolean value at a dotted path
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Get the subtree at a dotted path
    pub fn get_tree(&self, path: &str) -> Result<ConfigTree> {
        match self.get(path) {
            Some(Value::Object(map)) => Ok(ConfigTree { root: map.clone() }),
            Some(_) => Err(ConfigError::NotATree { path: path.to_string() }.into()),
            None => Err(ConfigError::MissingKey { path: path.to_string() }.into()),
        }
    }

    /// Check if a dotted path exists
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Set the value at a dotted path, creating intermediate trees as needed
    pub fn put(&mut self, path: &str, value: Value) -> Result<()> {
        let segments: Vec<&str> = path.split('.').collect();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Ok(()),
        };

        let mut current = &mut self.root;
        let mut walked = String::new();
        for segment in parents {
            if !walked.is_empty() {
                walked.push('.');
            }
            walked.push_str(segment);

            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match entry {
                Value::Object(map) => map,
                _ => return Err(ConfigError::NotATree { path: walked }.into()),
            };
        }

        current.insert(last.to_string(), value);
        Ok(())
    }

    /// Remove and return the value at a dotted path
    pub fn pop(&mut self, path: &str) -> Option<Value> {
        let segments: Vec<&str> = path.split('.').collect();
        let (last, parents) = segments.split_last()?;

        let mut current = &mut self.root;
        for segment in parents {
            current = current.get_mut(*segment)?.as_object_mut()?;
        }

        current.shift_remove(*last)
    }

    /// Get a direct child by its literal key
    pub fn child(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Check if a direct child exists
    pub fn contains_child(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Insert or replace a direct child
    pub fn set_child(&mut self, key: &str, value: Value) {
        self.root.insert(key.to_string(), value);
    }

    /// Remove a direct child
    pub fn remove_child(&mut self, key: &str) -> Option<Value> {
        self.root.shift_remove(key)
    }

    /// Get all top-level keys
    pub fn keys(&self) -> Vec<String> {
        self.root.keys().cloned().collect()
    }

    /// Iterate over direct children
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.root.iter()
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

impl From<Map<String, Value>> for ConfigTree {
    fn from(root: Map<String, Value>) -> Self {
        Self { root }
    }
}
