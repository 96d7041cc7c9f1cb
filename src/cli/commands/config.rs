//! `mbi config` command - Configuration inspection
//!
//! Shows the effective layered configuration and where it comes from.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::Path;

use crate::cli::helpers::{print_json, print_yaml, Context};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::clean::CleanRules;
use crate::core::columns::{ColumnCandidates, Field};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show only the global (user) config file
    #[arg(long = "global-only")]
    pub global_only: bool,

    /// Show only the local config file
    #[arg(long = "local-only")]
    pub local_only: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("workbook", "Workbook path used when --file is not given"),
    (
        "default_format",
        "Default output format (auto, tsv, json, yaml, csv, md)",
    ),
    ("brand_synonyms", "Extra manufacturer spellings (map: seen -> canonical)"),
    ("placeholders", "Extra cell values treated as missing"),
    ("columns", "Header candidates per logical field (map: field -> list)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    if args.global_only && args.local_only {
        return Err(miette::miette!(
            "Cannot specify both --global-only and --local-only"
        ));
    }
    if args.global_only {
        let path = Config::global_config_path()
            .ok_or_else(|| miette::miette!("Could not determine global config directory"))?;
        return show_file("Global config:", &path);
    }
    if args.local_only {
        return show_file("Local config:", &Config::local_config_path());
    }

    let ctx = Context::new(global);
    let effective = effective_config(&ctx);

    if let Some(key) = &args.key {
        let value = get_config_value(&effective, key)
            .ok_or_else(|| miette::miette!("Unknown configuration key '{}'", key))?;
        print!("{}", serde_yml::to_string(&value).into_diagnostic()?);
        return Ok(());
    }

    match ctx.format {
        OutputFormat::Json => print_json(&effective),
        OutputFormat::Yaml => print_yaml(&effective),
        _ => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            print!("{}", serde_yml::to_string(&effective).into_diagnostic()?);
            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Command-line flags (--file, --format)");
            println!("  2. Environment variables (MBI_WORKBOOK, MBI_FORMAT)");
            println!("  3. Local config (.mbi.yaml)");
            println!("  4. Global config (~/.config/mbi/config.yaml)");
            Ok(())
        }
    }
}

/// The configuration with flags applied and built-in defaults filled in
fn effective_config(ctx: &Context) -> Config {
    let rules = CleanRules::from_config(&ctx.config);
    let columns = Field::ALL
        .iter()
        .map(|&f| (f.key().to_string(), ctx.candidates.candidates(f)))
        .collect();
    Config {
        workbook: Some(ctx.workbook.clone()),
        default_format: Some(format!("{:?}", ctx.format).to_lowercase()),
        brand_synonyms: rules.brand_synonyms,
        placeholders: rules.placeholders,
        columns,
    }
}

fn get_config_value(config: &Config, key: &str) -> Option<serde_yml::Value> {
    let value = serde_yml::to_value(config).ok()?;
    match key.split_once('.') {
        Some(("columns", field)) => value.get("columns")?.get(field).cloned(),
        _ => value.get(key).cloned(),
    }
}

fn show_file(title: &str, path: &Path) -> Result<()> {
    println!("{} {}", style(title).bold(), style(path.display()).dim());
    println!();

    if path.exists() {
        let content = fs::read_to_string(path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }
    Ok(())
}

fn run_path() -> Result<()> {
    let global_path = Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))?;
    let local_path = Config::local_config_path();

    println!("{}", style("Configuration file paths:").bold());
    for (label, path) in [("Global:", global_path), ("Local: ", local_path)] {
        println!();
        println!("  {} {}", style(label).cyan(), path.display());
        if path.exists() {
            println!("          {}", style("(exists)").green());
        } else {
            println!("          {}", style("(not created)").dim());
        }
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!("{}", style("Fields accepted under 'columns':").bold());
    let defaults = ColumnCandidates::default();
    for field in Field::ALL {
        println!(
            "  {:<20} {}",
            style(field.key()).cyan(),
            style(defaults.candidates(field).join(", ")).dim()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value() {
        let mut config = Config {
            workbook: Some("parts.xlsx".into()),
            ..Default::default()
        };
        config
            .columns
            .insert("status".into(), vec!["State".into()]);

        assert_eq!(
            get_config_value(&config, "workbook"),
            Some(serde_yml::Value::String("parts.xlsx".into()))
        );
        let status = get_config_value(&config, "columns.status").unwrap();
        assert_eq!(status[0], serde_yml::Value::String("State".into()));
        assert!(get_config_value(&config, "nonexistent").is_none());
    }

    #[test]
    fn test_valid_keys_match_config_fields() {
        let config = Config {
            workbook: Some("x.xlsx".into()),
            default_format: Some("json".into()),
            brand_synonyms: [("A".to_string(), "B".to_string())].into(),
            placeholders: vec!["N/A".into()],
            columns: [("status".to_string(), vec!["State".to_string()])].into(),
        };
        for (key, _) in VALID_KEYS {
            assert!(get_config_value(&config, key).is_some(), "missing key {}", key);
        }
    }
}
