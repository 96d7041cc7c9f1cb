//! Core module - workbook loading, cleaning and column resolution

pub mod bom;
pub mod cache;
pub mod clean;
pub mod columns;
pub mod config;
pub mod natural;
pub mod sheet;
pub mod workbook;

#[cfg(test)]
pub(crate) mod fixtures;

pub use bom::{BomLine, ProjectBom};
pub use cache::DatasetCache;
pub use clean::{clean_sheet, CleanRules};
pub use columns::{resolve_column, ColumnCandidates, Field};
pub use config::Config;
pub use natural::{natural_cmp, natural_key, natural_sort};
pub use sheet::{Cell, Sheet};
pub use workbook::{select_sheets, Dataset, LoadError, SheetSelection};
