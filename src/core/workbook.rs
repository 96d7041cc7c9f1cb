//! Workbook loading and sheet discovery
//!
//! The parts workbook is not schema-controlled: sheets get renamed and
//! reordered. Logical tables are found by substring match on sheet names
//! (see [`select_sheets`]) and missing secondary sheets degrade to empty
//! tables instead of failing the load.

use calamine::{open_workbook_auto, Data, DataType, Reader};
use log::{debug, info};
use miette::Diagnostic;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

use crate::core::clean::{clean_sheet, CleanRules};
use crate::core::sheet::{Cell, Sheet};

/// Errors raised while loading a workbook
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("file not found: {}", path.display())]
    #[diagnostic(
        code(mbi::load::not_found),
        help("place the parts workbook at this path or pass --file <PATH>")
    )]
    NotFound { path: PathBuf },

    #[error("data load error: {message}")]
    #[diagnostic(
        code(mbi::load::read),
        help("check that the file is a valid .xlsx/.xls/.ods workbook and is not open elsewhere")
    )]
    Read { path: PathBuf, message: String },

    #[error("workbook {} contains no sheets", path.display())]
    #[diagnostic(code(mbi::load::empty))]
    Empty { path: PathBuf },
}

impl LoadError {
    /// Only a missing file is `NotFound`; other I/O failures are read errors
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::Read {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        }
    }
}

/// Which workbook sheet fills each logical table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetSelection {
    pub components: Option<String>,
    pub sets: Option<String>,
    pub projects: Option<String>,
}

/// Pick the components, sets and projects sheets from a list of sheet names
///
/// - components: first name containing "Component", else the first sheet
/// - sets: first name containing "Set" and "Delivery", else first containing
///   "Delivery", else none
/// - projects: first name containing "Project" and "Considered", else none
pub fn select_sheets(names: &[String]) -> SheetSelection {
    let find = |pred: &dyn Fn(&str) -> bool| names.iter().find(|n| pred(n)).cloned();

    let components = find(&|n| n.contains("Component")).or_else(|| names.first().cloned());
    let sets = find(&|n| n.contains("Set") && n.contains("Delivery"))
        .or_else(|| find(&|n| n.contains("Delivery")));
    let projects = find(&|n| n.contains("Project") && n.contains("Considered"));

    SheetSelection {
        components,
        sets,
        projects,
    }
}

/// The three cleaned tables of a workbook snapshot
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub source: PathBuf,
    pub modified: Option<SystemTime>,
    pub sheet_names: Vec<String>,
    pub selection: SheetSelection,
    /// `None` only when nothing could be loaded
    pub components: Option<Sheet>,
    pub sets: Sheet,
    pub projects: Sheet,
}

impl Dataset {
    /// An all-empty dataset for a source that could not be read
    pub fn empty(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            ..Default::default()
        }
    }

    /// Load and clean all logical tables from a workbook
    pub fn load(path: &Path, rules: &CleanRules) -> Result<Self, LoadError> {
        let meta = std::fs::metadata(path).map_err(|e| LoadError::from_io(path, e))?;

        let read_err = |message: String| LoadError::Read {
            path: path.to_path_buf(),
            message,
        };

        let modified = meta.modified().ok();

        let mut workbook = open_workbook_auto(path).map_err(|e| read_err(e.to_string()))?;
        let sheet_names = workbook.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }

        let selection = select_sheets(&sheet_names);
        debug!(
            "sheet selection for {}: components={:?} sets={:?} projects={:?}",
            path.display(),
            selection.components,
            selection.sets,
            selection.projects
        );

        let mut read_sheet = |name: &str| -> Result<Sheet, LoadError> {
            let range = workbook
                .worksheet_range(name)
                .map_err(|e| read_err(format!("sheet '{}': {}", name, e)))?;
            let mut sheet = sheet_from_rows(name, range.rows());
            clean_sheet(&mut sheet, rules);
            debug!("loaded sheet '{}' ({} rows)", name, sheet.len());
            Ok(sheet)
        };

        let components = match &selection.components {
            Some(name) => Some(read_sheet(name)?),
            None => None,
        };

        let sets = match &selection.sets {
            Some(name) => read_sheet(name)?,
            None => {
                info!("no delivery sheet in {}", path.display());
                Sheet::empty()
            }
        };

        let projects = match &selection.projects {
            Some(name) => read_sheet(name)?,
            None => {
                info!("no projects sheet in {}", path.display());
                Sheet::empty()
            }
        };

        Ok(Self {
            source: path.to_path_buf(),
            modified,
            sheet_names,
            selection,
            components,
            sets,
            projects,
        })
    }

    /// Load, reporting any failure next to an all-empty dataset
    pub fn load_or_empty(path: &Path, rules: &CleanRules) -> (Self, Option<LoadError>) {
        match Self::load(path, rules) {
            Ok(dataset) => (dataset, None),
            Err(e) => (Self::empty(path), Some(e)),
        }
    }
}

/// Build a sheet from raw workbook rows (first row is the header)
fn sheet_from_rows<'a, I>(name: &str, mut rows: I) -> Sheet
where
    I: Iterator<Item = &'a [Data]>,
{
    let headers: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|c| convert_cell(c).to_string())
            .collect(),
        None => Vec::new(),
    };

    let data: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Sheet::from_rows(name, headers, data)
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => {
            cell.as_duration().map_or(Cell::Empty, Cell::Duration)
        }
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map_or_else(|| Cell::Text(cell.to_string()), Cell::DateTime),
        Data::DurationIso(_) => cell
            .as_duration()
            .map_or_else(|| Cell::Text(cell.to_string()), Cell::Duration),
    }
}
