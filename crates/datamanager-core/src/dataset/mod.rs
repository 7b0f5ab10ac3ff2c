//! # Datamanager Datasets
//!
//! In-memory dataset representations and the conversions between them.
//!
//! - [`Table`]: row-oriented table, what the local (file) storage reads and writes.
//! - [`PartitionedTable`]: the same data split into ordered partitions, what the
//!   partitioned (distributed) storage reads and writes.
//! - [`Dataset`]: either of the above, tagged with its [`DatasetKind`].
//! - [`DatasetConverter`]: registry of `(from, to)` conversions used on save.
//!
//! Cell values are `serde_json::Value`s: null, booleans, numbers, strings and
//! nested arrays/objects.
pub mod converter;
pub mod error;
pub mod table;

pub use converter::{ConverterFn, DatasetConverter};
pub use error::DatasetError;
pub use table::{Dataset, DatasetKind, PartitionedTable, Row, Table};
