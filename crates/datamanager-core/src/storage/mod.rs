//! # Datamanager Storage
//!
//! Physical I/O for datasets.
//!
//! - [`StorageProvider`]: filesystem handle ([`LocalStorageProvider`] ships with
//!   the crate), the only place bytes touch the disk.
//! - [`StorageManager`]: load/save/delete/exists for one storage technology,
//!   addressing keys through a backend's [`ResourceAccess`]:
//!   - [`TableStorageManager`]: one file per key, row-oriented tables;
//!   - [`PartitionedStorageManager`]: a directory of part files per key,
//!     partitioned tables, sharing a [`Session`].
pub mod error;
pub mod local;
pub mod manager;
pub mod partitioned;
pub mod provider;
pub mod session;
pub mod table;

pub use error::StorageSystemError;
pub use local::LocalStorageProvider;
pub use manager::{ResourceAccess, SaveOptions, StorageManager};
pub use partitioned::PartitionedStorageManager;
pub use provider::StorageProvider;
pub use session::Session;
pub use table::TableStorageManager;

#[cfg(test)]
mod tests;
