//! # Datamanager Data Managers
//!
//! The composition layer.
//!
//! - [`DataManager`]: the contract of a single backend.
//! - [`Backend`]: a data manager assembled from a resource manager, a
//!   resolver, a storage manager and a dataset converter. Constructors exist
//!   for the four standard backends (`local-base_path`, `local-configured`,
//!   `hdfs-base_path`, `hdfs-configured`).
//! - [`CompositeDataManager`]: priority-ordered, context-aware dispatch over
//!   several backends, with an explicit backend override on every operation.
//! - [`DataManagerFactory`]: builds composites from configuration and base
//!   directories.
pub mod backend;
pub mod composite;
pub mod error;
pub mod factory;
pub mod traits;

pub use backend::{Backend, BackendOptions};
pub use composite::CompositeDataManager;
pub use error::DispatchError;
pub use factory::DataManagerFactory;
pub use traits::DataManager;

#[cfg(test)]
mod tests;
