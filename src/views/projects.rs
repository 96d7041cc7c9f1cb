//! Projects considered: BOM readiness against the current inventory

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::core::bom::{self, ProjectBom};
use crate::core::columns::{project_component_columns, ColumnCandidates};
use crate::core::natural::natural_cmp;
use crate::core::sheet::Sheet;
use crate::views::filter;
use crate::views::ViewError;

/// Status shown for references with no inventory row
pub const NOT_IN_INVENTORY: &str = "Not In Inventory";

#[derive(Debug, Clone, Default)]
pub struct ProjectsQuery {
    pub projects: Vec<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectsKpis {
    pub projects: usize,
    pub average_readiness_pct: u32,
    pub fully_ready: usize,
    pub referenced_parts: usize,
}

/// A part holding back one or more projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockingPart {
    pub part_number: String,
    pub status: String,
    pub projects: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectsView {
    pub project_options: Vec<String>,
    pub kpis: ProjectsKpis,
    pub boms: Vec<ProjectBom>,
    pub blocking: Vec<BlockingPart>,
}

impl ProjectsView {
    /// The single project in view, if the filters narrowed it down to one
    pub fn detail(&self) -> Option<&ProjectBom> {
        match self.boms.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Build the projects view
///
/// Fails with [`ViewError::DataMissing`] when there is no projects sheet.
pub fn build(
    projects: &Sheet,
    components: &Sheet,
    query: &ProjectsQuery,
    candidates: &ColumnCandidates,
) -> Result<ProjectsView, ViewError> {
    if projects.is_empty() || projects.headers.is_empty() {
        return Err(ViewError::missing(
            "Projects",
            "the workbook needs a sheet named like 'Projects Considered' with 'Component N' columns",
        ));
    }

    let name_col = projects.headers[0].clone();
    let project_options = filter::options(projects, &name_col);
    let mut rows = filter::select(projects, &name_col, &query.projects);
    if let Some(q) = &query.search {
        let mut searched: Vec<String> = vec![name_col.clone()];
        searched.extend(project_component_columns(projects).into_iter().map(str::to_string));
        rows = filter::search(&rows, q, Some(&searched));
    }

    let boms = bom::resolve_all(&rows, components, candidates);

    let kpis = ProjectsKpis {
        projects: boms.len(),
        average_readiness_pct: if boms.is_empty() {
            0
        } else {
            boms.iter().map(|b| b.readiness_pct).sum::<u32>() / boms.len() as u32
        },
        fully_ready: boms.iter().filter(|b| b.is_ready()).count(),
        referenced_parts: boms.iter().map(|b| b.total_parts).sum(),
    };

    let blocking = blocking_parts(&boms);

    Ok(ProjectsView {
        project_options,
        kpis,
        boms,
        blocking,
    })
}

/// Parts that are not available, with the number of projects they block
pub fn blocking_parts(boms: &[ProjectBom]) -> Vec<BlockingPart> {
    let mut by_part: HashMap<(String, String), BTreeSet<&str>> = HashMap::new();
    for project in boms {
        for line in project.lines.iter().filter(|l| !l.is_available()) {
            let status = match &line.inventory {
                None => NOT_IN_INVENTORY.to_string(),
                Some(m) => m.status.clone().unwrap_or_else(|| "Unknown".to_string()),
            };
            by_part
                .entry((line.part_number.clone(), status))
                .or_default()
                .insert(project.project.as_str());
        }
    }

    let mut out: Vec<BlockingPart> = by_part
        .into_iter()
        .map(|((part_number, status), projects)| BlockingPart {
            part_number,
            status,
            projects: projects.len(),
        })
        .collect();
    out.sort_by(|a, b| {
        b.projects
            .cmp(&a.projects)
            .then_with(|| natural_cmp(&a.part_number, &b.part_number))
            .then_with(|| a.status.cmp(&b.status))
    });
    out
}
