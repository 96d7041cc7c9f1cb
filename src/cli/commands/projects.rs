//! `mbi projects` command - Project BOM readiness

use console::style;
use miette::Result;

use crate::cli::chart::gauge;
use crate::cli::helpers::{describe_filter, heading, print_json, print_yaml, Context};
use crate::cli::table::{percent_style, CellValue, Table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::bom::ProjectBom;
use crate::core::sheet::Sheet;
use crate::views::projects::{self, ProjectsQuery, ProjectsView, NOT_IN_INVENTORY};

#[derive(clap::Args, Debug, Default)]
pub struct ProjectsArgs {
    /// Only show this project (repeatable, case-insensitive)
    #[arg(long, short = 'p')]
    pub project: Vec<String>,

    /// Case-insensitive search over project names and part numbers
    #[arg(long)]
    pub search: Option<String>,
}

impl ProjectsArgs {
    pub fn query(&self) -> ProjectsQuery {
        ProjectsQuery {
            projects: self.project.clone(),
            search: self.search.clone().filter(|s| !s.is_empty()),
        }
    }
}

pub fn run(args: ProjectsArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::new(global);
    let dataset = ctx.load()?;
    let empty = Sheet::empty();
    let components = dataset.components.as_ref().unwrap_or(&empty);
    let view = projects::build(&dataset.projects, components, &args.query(), &ctx.candidates)?;

    match ctx.format {
        OutputFormat::Json => print_json(&view),
        OutputFormat::Yaml => print_yaml(&view),
        OutputFormat::Tsv | OutputFormat::Csv | OutputFormat::Md => {
            readiness_table(&view.boms, false).output(ctx.format)
        }
        OutputFormat::Auto => render(&view, &args, &ctx),
    }
}

/// Human-readable projects dashboard
pub fn render(view: &ProjectsView, args: &ProjectsArgs, ctx: &Context) -> Result<()> {
    println!("{}", style("Project Readiness").bold().underlined());
    if !ctx.quiet {
        println!(
            "{}",
            style(format!(
                "projects: {}{}",
                describe_filter(&args.project),
                args.search
                    .as_deref()
                    .map(|q| format!("  search: \"{}\"", q))
                    .unwrap_or_default()
            ))
            .dim()
        );
    }
    println!();

    for line in kpi_lines(view) {
        println!("  {}", line);
    }

    println!();
    heading("BOM READINESS");
    if view.boms.is_empty() {
        println!("  {}", style("No projects match the current filters").dim());
        return Ok(());
    }
    readiness_table(&view.boms, true).output(OutputFormat::Auto)?;

    if !view.blocking.is_empty() {
        println!();
        heading("BLOCKING PARTS");
        let mut table = Table::new(["Part No", "Status", "Projects"]);
        for part in &view.blocking {
            table.row(vec![
                CellValue::Text(part.part_number.clone()),
                CellValue::Status(part.status.clone()),
                CellValue::Number(part.projects),
            ]);
        }
        table.output(OutputFormat::Auto)?;
    }

    if let Some(bom) = view.detail() {
        println!();
        heading(&format!("BOM DETAIL: {}", bom.project));
        println!("  {}", gauge(bom.readiness_pct, 30));
        println!();
        detail_table(bom).output(OutputFormat::Auto)?;
    }

    Ok(())
}

/// KPI lines, shared with `mbi status`
pub fn kpi_lines(view: &ProjectsView) -> Vec<String> {
    let k = &view.kpis;
    vec![
        format!("Projects:   {}", style(k.projects).cyan()),
        format!(
            "Avg Ready:  {}",
            percent_style(k.average_readiness_pct, &format!("{}%", k.average_readiness_pct))
        ),
        format!("Ready:      {}", k.fully_ready),
        format!("Parts Ref:  {}", k.referenced_parts),
    ]
}

fn readiness_table(boms: &[ProjectBom], styled: bool) -> Table {
    let mut table = Table::new(["Project", "Parts", "In Stock", "Readiness"]);
    for bom in boms {
        let readiness = if styled {
            CellValue::Percent(bom.readiness_pct)
        } else {
            CellValue::Number(bom.readiness_pct as usize)
        };
        table.row(vec![
            CellValue::Text(bom.project.clone()),
            CellValue::Number(bom.total_parts),
            CellValue::Number(bom.in_stock),
            readiness,
        ]);
    }
    table
}

fn detail_table(bom: &ProjectBom) -> Table {
    let mut table = Table::new(["Part No", "Name", "Category", "Status"]);
    for line in &bom.lines {
        let text = |v: Option<&String>| v.cloned().map_or(CellValue::Empty, CellValue::Text);
        let (name, category, status) = match &line.inventory {
            Some(m) => (
                text(m.name.as_ref()),
                text(m.category.as_ref()),
                m.status.clone().map_or(CellValue::Empty, CellValue::Status),
            ),
            None => (
                CellValue::Empty,
                CellValue::Empty,
                CellValue::Status(NOT_IN_INVENTORY.to_string()),
            ),
        };
        table.row(vec![CellValue::Text(line.part_number.clone()), name, category, status]);
    }
    table
}
