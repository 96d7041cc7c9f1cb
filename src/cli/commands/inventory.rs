//! `mbi inventory` command - Inventory overview

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::chart::{bar_chart, BAR_WIDTH};
use crate::cli::helpers::{describe_filter, heading, print_json, print_yaml, Context};
use crate::cli::table::{percent_style, Table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::sheet::{Records, Sheet};
use crate::views::inventory::{self, HierarchyNode, InventoryQuery, InventoryView};

#[derive(clap::Args, Debug, Default)]
pub struct InventoryArgs {
    /// Only show parts with this status (repeatable, case-insensitive)
    #[arg(long, short = 's')]
    pub status: Vec<String>,

    /// Only show parts in this category (repeatable, case-insensitive)
    #[arg(long, short = 'c')]
    pub category: Vec<String>,

    /// Case-insensitive text search across all columns
    #[arg(long)]
    pub search: Option<String>,

    /// Print the filtered parts table
    #[arg(long, short = 'l')]
    pub list: bool,

    /// Limit charts to the N largest entries
    #[arg(long, short = 'n')]
    pub top: Option<usize>,
}

impl InventoryArgs {
    pub fn query(&self) -> InventoryQuery {
        InventoryQuery {
            statuses: self.status.clone(),
            categories: self.category.clone(),
            search: self.search.clone().filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Serialize)]
struct InventoryOutput<'a> {
    #[serde(flatten)]
    view: &'a InventoryView,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<Records<'a>>,
}

pub fn run(args: InventoryArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::new(global);
    let dataset = ctx.load()?;
    let empty = Sheet::empty();
    let components = dataset.components.as_ref().unwrap_or(&empty);

    let view = inventory::build(components, &args.query(), &ctx.candidates);

    match ctx.format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let output = InventoryOutput {
                view: &view,
                rows: args.list.then(|| view.rows.records()),
            };
            if ctx.format == OutputFormat::Json {
                print_json(&output)
            } else {
                print_yaml(&output)
            }
        }
        OutputFormat::Tsv | OutputFormat::Csv | OutputFormat::Md => {
            Table::from_sheet(&view.rows, &ctx.rules).output(ctx.format)
        }
        OutputFormat::Auto => {
            render(&view, &args, &ctx)?;
            if args.list {
                println!();
                Table::from_sheet(&view.rows, &ctx.rules).output(OutputFormat::Auto)?;
            }
            Ok(())
        }
    }
}

/// Human-readable inventory dashboard
pub fn render(view: &InventoryView, args: &InventoryArgs, ctx: &Context) -> Result<()> {
    println!("{}", style("Inventory Overview").bold().underlined());
    if !ctx.quiet {
        println!(
            "{}",
            style(format!(
                "status: {}  category: {}{}",
                describe_filter(&args.status),
                describe_filter(&args.category),
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

    let limit = |n: usize| args.top.map_or(n, |top| top.min(n));

    if let Some(statuses) = &view.status_breakdown {
        println!();
        heading("STATUS");
        bar_chart(statuses, BAR_WIDTH);
    }

    if let Some(categories) = &view.category_distribution {
        println!();
        heading("CATEGORIES");
        bar_chart(&categories[..limit(categories.len())], BAR_WIDTH);
    }

    if let Some(brands) = &view.top_manufacturers {
        println!();
        heading("TOP MANUFACTURERS");
        bar_chart(&brands[..limit(brands.len())], BAR_WIDTH);
    }

    if let Some(tree) = &view.hierarchy {
        println!();
        heading("CATEGORY HIERARCHY");
        print_tree(tree, 1);
    }
    Ok(())
}

/// KPI lines, shared with `mbi status`
pub fn kpi_lines(view: &InventoryView) -> Vec<String> {
    let k = &view.kpis;
    let mut lines = vec![format!("Total Parts:   {}", style(k.total_parts).cyan())];
    if let Some(available) = k.available {
        lines.push(format!(
            "Available:     {} ({})",
            available,
            percent_style(k.availability_pct, &format!("{}%", k.availability_pct))
        ));
    }
    if let Some(categories) = k.categories {
        lines.push(format!("Categories:    {}", categories));
    }
    if let Some(manufacturers) = k.manufacturers {
        lines.push(format!("Manufacturers: {}", manufacturers));
    }
    lines
}

fn print_tree(nodes: &[HierarchyNode], depth: usize) {
    for node in nodes {
        let label = if depth == 1 {
            style(&node.label).bold().to_string()
        } else {
            node.label.clone()
        };
        println!("{}{} {}", "  ".repeat(depth), label, style(format!("({})", node.count)).dim());
        print_tree(&node.children, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sheet::Cell;
    use crate::core::ColumnCandidates;

    #[test]
    fn test_query_from_args() {
        let args = InventoryArgs {
            status: vec!["Available".into()],
            search: Some(String::new()),
            ..Default::default()
        };
        let query = args.query();
        assert_eq!(query.statuses, vec!["Available"]);
        assert!(query.search.is_none());
    }

    #[test]
    fn test_kpi_lines_skip_missing_columns() {
        console::set_colors_enabled(false);
        let sheet = Sheet::from_rows("C", vec!["Name".into()], vec![vec![Cell::Text("Servo".into())]]);
        let view = inventory::build(&sheet, &InventoryQuery::default(), &ColumnCandidates::default());
        let lines = kpi_lines(&view);
        assert_eq!(lines, vec!["Total Parts:   1"]);
    }
}
