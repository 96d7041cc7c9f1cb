//! `mbi delivery` command - Set delivery tracking

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::chart::{gauge, stacked_line, BAR_WIDTH};
use crate::cli::helpers::{describe_filter, heading, print_json, print_yaml, Context};
use crate::cli::table::{CellValue, Table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::sheet::Records;
use crate::views::delivery::{self, DeliveryQuery, DeliveryView};

#[derive(clap::Args, Debug, Default)]
pub struct DeliveryArgs {
    /// Only show this set (repeatable, case-insensitive)
    #[arg(long)]
    pub set: Vec<String>,

    /// Case-insensitive text search across all columns
    #[arg(long)]
    pub search: Option<String>,

    /// Print the filtered delivery table
    #[arg(long, short = 'l')]
    pub list: bool,
}

impl DeliveryArgs {
    pub fn query(&self) -> DeliveryQuery {
        DeliveryQuery {
            sets: self.set.clone(),
            search: self.search.clone().filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Serialize)]
struct DeliveryOutput<'a> {
    #[serde(flatten)]
    view: &'a DeliveryView,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<Records<'a>>,
}

pub fn run(args: DeliveryArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::new(global);
    let dataset = ctx.load()?;
    let view = delivery::build(&dataset.sets, &args.query(), &ctx.candidates)?;

    match ctx.format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let output = DeliveryOutput {
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

/// Human-readable delivery dashboard
pub fn render(view: &DeliveryView, args: &DeliveryArgs, ctx: &Context) -> Result<()> {
    println!("{}", style("Delivery Tracking").bold().underlined());
    if !ctx.quiet {
        println!(
            "{}",
            style(format!(
                "sets: {}{}",
                describe_filter(&args.set),
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

    if !view.composition.is_empty() {
        println!();
        heading("SET COMPOSITION");
        let max = view.composition.iter().map(|c| c.total()).max().unwrap_or(0);
        for set in &view.composition {
            println!("{}", stacked_line(&set.set, &set.statuses, max, BAR_WIDTH));
        }
        println!(
            "  {} released  {} other",
            style("█").green(),
            style("▒").yellow()
        );
    }

    println!();
    heading("EXCEPTIONS");
    if view.exceptions.is_empty() {
        println!("  {}", style("All items released").green());
        return Ok(());
    }
    let mut table = Table::new(["Set", "Status", "Link"]);
    for e in &view.exceptions {
        table.row(vec![
            CellValue::Text(e.set.clone()),
            CellValue::Status(e.status.clone()),
            e.link.clone().map_or(CellValue::Empty, CellValue::Link),
        ]);
    }
    table.output(OutputFormat::Auto)
}

/// KPI lines, shared with `mbi status`
pub fn kpi_lines(view: &DeliveryView) -> Vec<String> {
    let k = &view.kpis;
    vec![
        format!("Items:      {}", style(k.items).cyan()),
        format!("Released:   {}", k.released),
        format!("Pending:    {}", k.pending),
        format!("Readiness:  {}", gauge(k.released_pct, 20)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_args() {
        let args = DeliveryArgs {
            set: vec!["Set 2".into()],
            search: Some("servo".into()),
            list: false,
        };
        let query = args.query();
        assert_eq!(query.sets, vec!["Set 2"]);
        assert_eq!(query.search.as_deref(), Some("servo"));
    }
}
