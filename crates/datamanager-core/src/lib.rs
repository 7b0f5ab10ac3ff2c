//! # Datamanager Core
//!
//! Named datasets over local and partitioned storage.
//!
//! Callers refer to datasets by key. A [`CompositeDataManager`] routes each
//! key, by priority and by read/write context, to one of its backends. Each
//! backend combines a resource manager (which keys exist and how they are
//! described), a resolver (where a key lives), and a storage manager (how its
//! bytes are read and written).
//!
//! ## Modules
//!
//! - [`config`]: hierarchical configuration trees loaded from JSON, YAML or TOML
//! - [`dataset`]: in-memory tables, their partitioned form and conversion
//! - [`format`]: parquet, csv, json and jsonl readers/writers
//! - [`resource`]: descriptors, resource managers and resolvers
//! - [`storage`]: filesystem access and the storage technologies
//! - [`manager`]: backends, the composite and its factory
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod format;
pub mod logging;
pub mod manager;
pub mod resource;
pub mod storage;

pub use config::ConfigTree;
pub use dataset::{Dataset, DatasetConverter, DatasetKind, PartitionedTable, Table};
pub use error::{Error, Result};
pub use format::{FormatRegistry, Options, TableFormat};
pub use manager::{Backend, BackendOptions, CompositeDataManager, DataManager, DataManagerFactory};
pub use resource::{DataContext, ResourceDescriptor};
pub use storage::{SaveOptions, Session, StorageProvider};

#[cfg(test)]
mod tests;
