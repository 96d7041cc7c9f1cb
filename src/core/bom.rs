//! Project bill-of-materials resolution
//!
//! The projects sheet is wide: one row per project, part numbers spread over
//! `Component 1..N` columns. A project's references are unpivoted and
//! left-joined against the inventory on part number to compute readiness.
//!
//! The join is a plain equi-join. Several inventory rows sharing a part
//! number all attach, and references with no inventory row still count
//! towards `total_parts`.

use serde::Serialize;

use crate::core::columns::{project_component_columns, ColumnCandidates, Field};
use crate::core::sheet::{Cell, Sheet};

/// Values in a component column that do not reference a part
const NON_REFERENCES: &[&str] = &["", "-", "unknown", "nan", "none"];

/// Inventory data attached to a BOM line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryMatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

/// One joined (reference, inventory row) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomLine {
    pub part_number: String,
    /// `None` when no inventory row has this part number
    pub inventory: Option<InventoryMatch>,
}

impl BomLine {
    pub fn status(&self) -> Option<&str> {
        self.inventory.as_ref().and_then(|m| m.status.as_deref())
    }

    pub fn is_available(&self) -> bool {
        self.status()
            .is_some_and(|s| s.to_lowercase().contains("available"))
    }
}

/// A project's resolved BOM and readiness
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectBom {
    pub project: String,
    pub lines: Vec<BomLine>,
    pub total_parts: usize,
    pub in_stock: usize,
    pub readiness_pct: u32,
}

impl ProjectBom {
    pub fn unmatched(&self) -> impl Iterator<Item = &BomLine> {
        self.lines.iter().filter(|l| l.inventory.is_none())
    }

    pub fn is_ready(&self) -> bool {
        self.total_parts > 0 && self.in_stock == self.total_parts
    }
}

/// Percentage rounded down, 0 for an empty denominator
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((part * 100) / total) as u32
    }
}

fn is_reference(cell: &Cell) -> bool {
    let value = cell.to_string();
    let value = value.trim();
    !NON_REFERENCES.contains(&value.to_lowercase().as_str())
}

/// Part numbers referenced by one project row
pub fn project_refs(projects: &Sheet, row: usize) -> Vec<String> {
    project_component_columns(projects)
        .into_iter()
        .filter_map(|header| projects.value(row, header))
        .filter(|cell| is_reference(cell))
        .map(|cell| cell.to_string().trim().to_string())
        .collect()
}

/// Name of the project in a row (always the first column)
pub fn project_name(projects: &Sheet, row: usize) -> String {
    projects
        .rows
        .get(row)
        .and_then(|r| r.first())
        .map(|c| c.to_string())
        .unwrap_or_default()
}

/// Resolved inventory columns used by the join
struct InventoryColumns {
    part: Option<String>,
    name: Option<String>,
    category: Option<String>,
    status: Option<String>,
}

impl InventoryColumns {
    fn resolve(components: &Sheet, candidates: &ColumnCandidates) -> Self {
        Self {
            part: candidates.resolve_owned(components, Field::PartNumber),
            name: candidates.resolve_owned(components, Field::Name),
            category: candidates.resolve_owned(components, Field::Category),
            status: candidates.resolve_owned(components, Field::Status),
        }
    }

    fn attach(&self, components: &Sheet, row: usize) -> InventoryMatch {
        let get = |col: &Option<String>| {
            col.as_deref()
                .and_then(|c| components.value(row, c))
                .filter(|cell| !cell.is_empty())
                .map(|cell| cell.to_string())
        };
        InventoryMatch {
            name: get(&self.name),
            category: get(&self.category),
            status: get(&self.status),
        }
    }
}

/// Left-join a project's references against the inventory
pub fn resolve_bom(
    project: &str,
    refs: &[String],
    components: &Sheet,
    candidates: &ColumnCandidates,
) -> ProjectBom {
    let cols = InventoryColumns::resolve(components, candidates);

    let mut lines = Vec::new();
    for part in refs {
        let matches: Vec<usize> = match &cols.part {
            Some(part_col) => components
                .column(part_col)
                .enumerate()
                .filter(|(_, cell)| cell.to_string().trim() == part)
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        };

        if matches.is_empty() {
            lines.push(BomLine {
                part_number: part.clone(),
                inventory: None,
            });
        } else {
            for row in matches {
                lines.push(BomLine {
                    part_number: part.clone(),
                    inventory: Some(cols.attach(components, row)),
                });
            }
        }
    }

    let total_parts = lines.len();
    let in_stock = lines.iter().filter(|l| l.is_available()).count();

    ProjectBom {
        project: project.to_string(),
        readiness_pct: percent(in_stock, total_parts),
        lines,
        total_parts,
        in_stock,
    }
}

/// Resolve every project in the projects sheet
pub fn resolve_all(
    projects: &Sheet,
    components: &Sheet,
    candidates: &ColumnCandidates,
) -> Vec<ProjectBom> {
    (0..projects.len())
        .map(|row| {
            let name = project_name(projects, row);
            let refs = project_refs(projects, row);
            resolve_bom(&name, &refs, components, candidates)
        })
        .collect()
}
