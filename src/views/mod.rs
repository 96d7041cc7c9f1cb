//! Dashboard views
//!
//! Each view is a pure function from a [`Dataset`](crate::core::Dataset) and a
//! query (filters + search) to a serializable view model. Rendering lives in
//! the CLI layer.

pub mod delivery;
pub mod filter;
pub mod inventory;
pub mod projects;

use miette::Diagnostic;
use thiserror::Error;

pub use delivery::{DeliveryQuery, DeliveryView};
pub use filter::Count;
pub use inventory::{InventoryQuery, InventoryView};
pub use projects::{ProjectsQuery, ProjectsView};

/// Errors that stop a single view from rendering
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("{view} data missing")]
    #[diagnostic(code(mbi::view::data_missing))]
    DataMissing {
        view: &'static str,
        #[help]
        help: String,
    },
}

impl ViewError {
    pub fn missing(view: &'static str, help: impl Into<String>) -> Self {
        ViewError::DataMissing {
            view,
            help: help.into(),
        }
    }
}
