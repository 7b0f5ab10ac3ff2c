//! # Datamanager Dispatch Errors
//!
//! [`DispatchError`] covers the choice of a backend: by the composite's
//! priority dispatch, by an explicit backend id, or while the factory
//! assembles the composite.
use thiserror::Error;

use crate::resource::DataContext;

fn describe_context(context: &Option<DataContext>) -> String {
    match context {
        Some(context) => format!(" for {}", context),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No backend found for dataset '{key}'{}", describe_context(.context))]
    NoBackendFound {
        key: String,
        context: Option<DataContext>,
    },

    #[error("Unknown backend '{id}'")]
    UnknownBackend { id: String },

    #[error("Backend '{id}' is registered more than once")]
    DuplicateBackend { id: String },

    #[error("{factory} needs a configuration or a base directory")]
    MissingInputs { factory: String },
}
