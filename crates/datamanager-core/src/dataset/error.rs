//! # Datamanager Dataset Errors
//!
//! [`DatasetError`] covers building in-memory datasets (rows that do not
//! match the column count, unknown columns) and converting between dataset
//! representations.
use thiserror::Error;

use crate::dataset::DatasetKind;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("There is no converter registered to go from '{from}' to '{to}'")]
    NoConverter { from: DatasetKind, to: DatasetKind },

    #[error("Conversion from '{from}' to '{to}' failed: {message}")]
    ConversionFailed {
        from: DatasetKind,
        to: DatasetKind,
        message: String,
    },

    #[error("Row {row} has {found} values but the dataset has {expected} columns")]
    RowWidth { row: usize, expected: usize, found: usize },

    #[error("Unknown column '{column}'")]
    UnknownColumn { column: String },

    #[error("Cannot use all columns {columns:?} as partition columns")]
    AllColumnsPartitioned { columns: Vec<String> },
}
