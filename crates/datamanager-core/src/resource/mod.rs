//! # Datamanager Resources
//!
//! Key bookkeeping for a backend, split in two roles:
//!
//! - a [`ResourceManager`] owns the key → [`ResourceDescriptor`] association
//!   and decides, per [`DataContext`], whether the backend can serve a key;
//! - a [`ResourceResolver`] turns a key into the physical address the storage
//!   manager works on.
//!
//! Two families ship with the crate: base path (a flat directory, new keys
//! are always writable) and configured (descriptors declared in a
//! configuration subtree).
pub mod base_path;
pub mod configured;
pub mod descriptor;
pub mod error;
pub mod manager;
pub mod resolver;

pub use base_path::BasePathResourceManager;
pub use configured::ConfiguredResourceManager;
pub use descriptor::{DataContext, ResourceDescriptor};
pub use error::ResourceError;
pub use manager::ResourceManager;
pub use resolver::{BasePathResolver, ConfiguredPathResolver, ResourceResolver};
