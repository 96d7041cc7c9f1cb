//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, dashboard::DashboardArgs,
    delivery::DeliveryArgs, inventory::InventoryArgs, projects::ProjectsArgs, sheets::SheetsArgs,
    status::StatusArgs,
};

#[derive(Parser)]
#[command(name = "mbi")]
#[command(author, version, about = "Mechatronics BI")]
#[command(long_about = "A terminal dashboard for the mechatronics parts workbook: inventory availability, delivery tracking and project readiness.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Workbook to load (default: from config, else "Mechatronics Project Parts_Data.xlsx")
    #[arg(long = "file", short = 'F', global = true, env = "MBI_WORKBOOK")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inventory overview (availability, categories, manufacturers)
    #[command(alias = "inv")]
    Inventory(InventoryArgs),

    /// Delivery tracking by set
    #[command(alias = "del")]
    Delivery(DeliveryArgs),

    /// Project BOM readiness
    #[command(alias = "proj")]
    Projects(ProjectsArgs),

    /// Combined overview of all pages
    Status(StatusArgs),

    /// Show workbook sheets and resolved columns
    Sheets(SheetsArgs),

    /// Interactive dashboard (page selector, filters, search, refresh)
    Dashboard(DashboardArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable dashboard
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Resolve `auto` against a configured default (e.g. "json")
    pub fn or_default(self, configured: Option<&str>) -> Self {
        match (self, configured) {
            (OutputFormat::Auto, Some(name)) => {
                OutputFormat::from_str(name, true).unwrap_or(OutputFormat::Auto)
            }
            (format, _) => format,
        }
    }
}
