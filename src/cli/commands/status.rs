//! `mbi status` command - Combined overview of all dashboard pages

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::{delivery, inventory, projects};
use crate::cli::helpers::{print_json, print_yaml, Context};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::sheet::Sheet;
use crate::core::Dataset;
use crate::views::{self, DeliveryView, InventoryView, ProjectsView, ViewError};

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Show only one section (inventory, delivery, projects)
    #[arg(long)]
    pub section: Option<Section>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Inventory,
    Delivery,
    Projects,
}

/// A page that either rendered or reports why it could not
#[derive(Serialize)]
#[serde(untagged)]
enum Page<T> {
    Ready(T),
    Missing { error: String },
}

impl<T> From<Result<T, ViewError>> for Page<T> {
    fn from(result: Result<T, ViewError>) -> Self {
        match result {
            Ok(view) => Page::Ready(view),
            Err(e) => Page::Missing { error: e.to_string() },
        }
    }
}

#[derive(Serialize)]
struct StatusReport {
    workbook: String,
    inventory: InventoryView,
    delivery: Page<DeliveryView>,
    projects: Page<ProjectsView>,
}

fn collect(dataset: &Dataset, ctx: &Context) -> StatusReport {
    let empty = Sheet::empty();
    let components = dataset.components.as_ref().unwrap_or(&empty);
    StatusReport {
        workbook: dataset.source.display().to_string(),
        inventory: views::inventory::build(components, &Default::default(), &ctx.candidates),
        delivery: views::delivery::build(&dataset.sets, &Default::default(), &ctx.candidates).into(),
        projects: views::projects::build(&dataset.projects, components, &Default::default(), &ctx.candidates)
            .into(),
    }
}

pub fn run(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::new(global);
    let dataset = ctx.load()?;
    let report = collect(&dataset, &ctx);

    match ctx.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Yaml => print_yaml(&report),
        _ => {
            render(&report, args.section);
            Ok(())
        }
    }
}

fn render(report: &StatusReport, section: Option<Section>) {
    let width = 68;

    println!("{}", style("Mechatronics BI Status").bold().underlined());
    println!("{}", style(&report.workbook).dim());
    println!("{}", "═".repeat(width));
    println!();

    let inventory_lines = inventory::kpi_lines(&report.inventory);
    let delivery_lines = page_lines(&report.delivery, delivery::kpi_lines);
    let projects_lines = page_lines(&report.projects, |view| {
        let mut lines = projects::kpi_lines(view);
        let unmatched: usize = view.boms.iter().map(|b| b.unmatched().count()).sum();
        if unmatched > 0 {
            lines.push(format!("Unmatched:  {} {}", unmatched, style("⚠").yellow()));
        }
        lines
    });

    match section {
        Some(Section::Inventory) => print_section("INVENTORY", &inventory_lines),
        Some(Section::Delivery) => print_section("DELIVERY", &delivery_lines),
        Some(Section::Projects) => print_section("PROJECTS", &projects_lines),
        None => {
            print_two_columns("INVENTORY", &inventory_lines, "DELIVERY", &delivery_lines);
            println!();
            print_section("PROJECTS", &projects_lines);
            println!();
            println!("{}", "═".repeat(width));
            let availability = report.inventory.kpis.availability_pct;
            let health = if report.inventory.kpis.is_healthy() {
                style(format!("Healthy ({}% available)", availability)).green().bold()
            } else {
                style(format!("Low stock ({}% available)", availability)).red().bold()
            };
            println!("Inventory Health: {}", health);
        }
    }
}

fn page_lines<T>(page: &Page<T>, lines: impl Fn(&T) -> Vec<String>) -> Vec<String> {
    match page {
        Page::Ready(view) => lines(view),
        Page::Missing { error } => vec![style(error).red().to_string()],
    }
}

// ANSI codes would break `{:<30}`, so pad on visible width
fn print_two_columns(title1: &str, lines1: &[String], title2: &str, lines2: &[String]) {
    let col_width = 32;

    println!("{:<col_width$} {}", style(title1).bold(), style(title2).bold());
    println!("{:-<col_width$} {:-<col_width$}", "", "");

    let max_lines = lines1.len().max(lines2.len());
    for i in 0..max_lines {
        let l1 = lines1.get(i).map(|s| s.as_str()).unwrap_or("");
        let l2 = lines2.get(i).map(|s| s.as_str()).unwrap_or("");
        let pad = 30usize.saturating_sub(console::measure_text_width(l1));
        println!("  {}{} {}", l1, " ".repeat(pad), l2);
    }
}

fn print_section(title: &str, lines: &[String]) {
    println!("{}", style(title).bold());
    println!("{:-<64}", "");
    for line in lines {
        println!("  {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_page_serializes_error() {
        let page: Page<DeliveryView> =
            Err(ViewError::missing("Delivery", "add a delivery sheet")).into();
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["error"], "Delivery data missing");
    }

    #[test]
    fn test_page_lines_for_missing_page() {
        console::set_colors_enabled(false);
        let page: Page<DeliveryView> = Page::Missing {
            error: "Delivery data missing".into(),
        };
        assert_eq!(page_lines(&page, delivery::kpi_lines), vec!["Delivery data missing"]);
    }
}
