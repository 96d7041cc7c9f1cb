//! Logical column resolution
//!
//! Workbook headers drift between revisions ("Set No" vs "Set", "Mfg" vs
//! "Manufacturer"). Views ask for a logical [`Field`] and get back whatever
//! header currently carries it, or `None` when the sheet has no such column.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::core::sheet::Sheet;
use crate::core::Config;

/// Return the first header matching a candidate, case-insensitively
///
/// Candidates are tried in order; for each candidate the first matching
/// header (in sheet order) wins.
pub fn resolve_column<'a, S: AsRef<str>>(sheet: &'a Sheet, candidates: &[S]) -> Option<&'a str> {
    candidates.iter().find_map(|cand| {
        let cand = cand.as_ref().to_lowercase();
        sheet
            .headers
            .iter()
            .find(|h| h.to_lowercase() == cand)
            .map(|h| h.as_str())
    })
}

/// Headers of a projects sheet holding part references (`Component 1..N`)
///
/// The first column is always the project name and is never included.
pub fn project_component_columns(sheet: &Sheet) -> Vec<&str> {
    sheet
        .headers
        .iter()
        .skip(1)
        .filter(|h| h.to_lowercase().starts_with("component"))
        .map(|h| h.as_str())
        .collect()
}

/// Logical fields the views know how to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Category,
    SubCategory,
    SubCategory2,
    Status,
    Brand,
    PartNumber,
    Name,
    Link,
    SetNo,
    FinalStatus,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Category,
        Field::SubCategory,
        Field::SubCategory2,
        Field::Status,
        Field::Brand,
        Field::PartNumber,
        Field::Name,
        Field::Link,
        Field::SetNo,
        Field::FinalStatus,
    ];

    /// Configuration key for this field
    pub fn key(&self) -> &'static str {
        match self {
            Field::Category => "category",
            Field::SubCategory => "sub_category",
            Field::SubCategory2 => "sub_category2",
            Field::Status => "status",
            Field::Brand => "brand",
            Field::PartNumber => "part_number",
            Field::Name => "name",
            Field::Link => "link",
            Field::SetNo => "set_no",
            Field::FinalStatus => "final_status",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Built-in header candidates, most specific first
    pub fn default_candidates(&self) -> &'static [&'static str] {
        match self {
            Field::Category => &["Category"],
            Field::SubCategory => &["SubCategory", "Sub Category"],
            Field::SubCategory2 => &["SubCategory2", "Sub Category 2"],
            Field::Status => &["Status"],
            Field::Brand => &["Mfg", "Manufacturer", "Brand"],
            Field::PartNumber => &[
                "Mfg Part No",
                "Mfg Part Number",
                "MPN",
                "Manufacturer Part Number",
                "Part Number",
                "Part No",
            ],
            Field::Name => &["Name", "Part Name", "Description", "Component Name"],
            Field::Link => &["Link", "Url"],
            Field::SetNo => &["Set No", "Set"],
            Field::FinalStatus => &["Final Status", "Status"],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The candidate table, with configured overrides applied
#[derive(Debug, Clone, Default)]
pub struct ColumnCandidates {
    overrides: HashMap<Field, Vec<String>>,
}

impl ColumnCandidates {
    pub fn from_config(config: &Config) -> Self {
        let mut overrides = HashMap::new();
        for (key, list) in &config.columns {
            match Field::from_key(key) {
                Some(field) if !list.is_empty() => {
                    overrides.insert(field, list.clone());
                }
                Some(_) => {}
                None => log::warn!("ignoring unknown column field '{}' in config", key),
            }
        }
        Self { overrides }
    }

    pub fn candidates(&self, field: Field) -> Vec<String> {
        match self.overrides.get(&field) {
            Some(list) => list.clone(),
            None => field
                .default_candidates()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Resolve a logical field against a sheet
    pub fn resolve<'a>(&self, sheet: &'a Sheet, field: Field) -> Option<&'a str> {
        resolve_column(sheet, &self.candidates(field))
    }

    /// Resolve and take an owned header
    pub fn resolve_owned(&self, sheet: &Sheet, field: Field) -> Option<String> {
        self.resolve(sheet, field).map(str::to_string)
    }
}
