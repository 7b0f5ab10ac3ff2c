//! # Datamanager Configuration
//!
//! Configuration documents describing datasets and backend locations.
//!
//! A [`ConfigTree`] is loaded from JSON, YAML (`yaml-config` feature) or TOML
//! (`toml-config` feature), the format being picked from the file extension
//! via [`ConfigFormat`]. The recognized shape is:
//!
//! ```text
//! local_path: /data/local          # base directory of the local base path backend
//! hdfs_path: /data/warehouse       # base directory of the partitioned base path backend
//! data:
//!   local:                         # resources of the local configured backend
//!     sales:
//!       path: /data/in/sales.csv
//!       type: csv
//!       options: { delimiter: ";" }
//!       save_options: {}
//!       read_only: true
//!   hdfs: { ... }                  # resources of the partitioned configured backend
//! ```
pub mod error;
pub mod format;
pub mod tree;

pub use error::ConfigError;
pub use format::ConfigFormat;
pub use tree::ConfigTree;
