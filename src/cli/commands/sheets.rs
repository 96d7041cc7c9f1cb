//! `mbi sheets` command - Workbook diagnostics

use chrono::{DateTime, Local};
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{print_json, print_yaml, Context};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::columns::project_component_columns;
use crate::core::sheet::Sheet;
use crate::core::{ColumnCandidates, Dataset, Field};

#[derive(clap::Args, Debug)]
pub struct SheetsArgs {
    /// Also list every header of the selected sheets
    #[arg(long)]
    pub headers: bool,
}

const COMPONENT_FIELDS: &[Field] = &[
    Field::Name,
    Field::Category,
    Field::SubCategory,
    Field::SubCategory2,
    Field::Status,
    Field::Brand,
    Field::PartNumber,
    Field::Link,
];
const SET_FIELDS: &[Field] = &[Field::SetNo, Field::FinalStatus, Field::Link];

#[derive(Debug, Serialize)]
struct SheetReport {
    name: String,
    role: Option<&'static str>,
    rows: Option<usize>,
    columns: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ResolvedColumn {
    table: &'static str,
    field: String,
    column: Option<String>,
}

#[derive(Debug, Serialize)]
struct WorkbookReport {
    workbook: String,
    modified: Option<String>,
    sheets: Vec<SheetReport>,
    columns: Vec<ResolvedColumn>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    headers: Vec<(String, Vec<String>)>,
}

pub fn run(args: SheetsArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::new(global);
    let dataset = ctx.load()?;
    let report = build_report(&dataset, &ctx.candidates, args.headers);

    match ctx.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Yaml => print_yaml(&report),
        _ => {
            render(&report);
            Ok(())
        }
    }
}

fn selected<'a>(dataset: &'a Dataset, name: &str) -> Option<(&'static str, &'a Sheet)> {
    let sel = &dataset.selection;
    if sel.components.as_deref() == Some(name) {
        dataset.components.as_ref().map(|s| ("components", s))
    } else if sel.sets.as_deref() == Some(name) {
        Some(("delivery", &dataset.sets))
    } else if sel.projects.as_deref() == Some(name) {
        Some(("projects", &dataset.projects))
    } else {
        None
    }
}

fn build_report(dataset: &Dataset, candidates: &ColumnCandidates, with_headers: bool) -> WorkbookReport {
    let sheets = dataset
        .sheet_names
        .iter()
        .map(|name| {
            let hit = selected(dataset, name);
            SheetReport {
                name: name.clone(),
                role: hit.map(|(role, _)| role),
                rows: hit.map(|(_, s)| s.len()),
                columns: hit.map(|(_, s)| s.headers.len()),
            }
        })
        .collect();

    let mut columns = Vec::new();
    if let Some(components) = &dataset.components {
        for &field in COMPONENT_FIELDS {
            columns.push(ResolvedColumn {
                table: "components",
                field: field.to_string(),
                column: candidates.resolve_owned(components, field),
            });
        }
    }
    if !dataset.sets.is_empty() {
        for &field in SET_FIELDS {
            columns.push(ResolvedColumn {
                table: "delivery",
                field: field.to_string(),
                column: candidates.resolve_owned(&dataset.sets, field),
            });
        }
    }
    if !dataset.projects.headers.is_empty() {
        let refs = project_component_columns(&dataset.projects);
        columns.push(ResolvedColumn {
            table: "projects",
            field: "project".to_string(),
            column: dataset.projects.headers.first().cloned(),
        });
        columns.push(ResolvedColumn {
            table: "projects",
            field: "components".to_string(),
            column: (!refs.is_empty()).then(|| refs.join(", ")),
        });
    }

    let headers = if with_headers {
        dataset
            .sheet_names
            .iter()
            .filter_map(|name| selected(dataset, name).map(|(_, s)| (name.clone(), s.headers.clone())))
            .collect()
    } else {
        Vec::new()
    };

    WorkbookReport {
        workbook: dataset.source.display().to_string(),
        modified: dataset.modified.map(|t| {
            let local: DateTime<Local> = t.into();
            local.format("%Y-%m-%d %H:%M").to_string()
        }),
        sheets,
        columns,
        headers,
    }
}

fn render(report: &WorkbookReport) {
    println!("{} {}", style("Workbook:").bold(), report.workbook);
    if let Some(modified) = &report.modified {
        println!("{} {}", style("Modified:").bold(), modified);
    }
    println!();

    let mut builder = Builder::default();
    builder.push_record(["Sheet", "Used As", "Rows", "Columns"]);
    for sheet in &report.sheets {
        builder.push_record([
            sheet.name.clone(),
            sheet.role.unwrap_or("-").to_string(),
            sheet.rows.map_or("-".to_string(), |n| n.to_string()),
            sheet.columns.map_or("-".to_string(), |n| n.to_string()),
        ]);
    }
    println!("{}", builder.build().with(Style::rounded()));

    println!();
    println!("{}", style("Resolved columns").bold());
    let mut builder = Builder::default();
    builder.push_record(["Table", "Field", "Column"]);
    for c in &report.columns {
        builder.push_record([
            c.table.to_string(),
            c.field.clone(),
            c.column.clone().unwrap_or_else(|| "(not found)".to_string()),
        ]);
    }
    println!("{}", builder.build().with(Style::rounded()));

    for (name, headers) in &report.headers {
        println!();
        println!("{} {}", style(name).cyan(), style(format!("({} columns)", headers.len())).dim());
        for h in headers {
            println!("  {}", h);
        }
    }
}
