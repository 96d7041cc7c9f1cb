//! Shared helper functions for CLI commands
//!
//! Loading context, machine-readable output and small string utilities used
//! by several command modules.

use console::{colors_enabled, style};
use log::debug;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{CleanRules, ColumnCandidates, Config, Dataset};

/// Everything a command needs to load and interpret the workbook
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub rules: CleanRules,
    pub candidates: ColumnCandidates,
    pub workbook: PathBuf,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Merge the layered config with command-line flags (flags win)
    pub fn new(global: &GlobalOpts) -> Self {
        let config = Config::load();
        let workbook = global.file.clone().unwrap_or_else(|| config.workbook());
        let format = global.format.or_default(config.default_format.as_deref());
        debug!("workbook {} format {:?}", workbook.display(), format);

        Self {
            rules: CleanRules::from_config(&config),
            candidates: ColumnCandidates::from_config(&config),
            config,
            workbook,
            format,
            quiet: global.quiet,
        }
    }

    /// Load the workbook, halting the command on any load error
    pub fn load(&self) -> Result<Dataset> {
        Ok(Dataset::load(&self.workbook, &self.rules)?)
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Print a value as YAML
pub fn print_yaml<T: Serialize>(value: &T) -> Result<()> {
    let yaml = serde_yml::to_string(value).into_diagnostic()?;
    print!("{}", yaml);
    Ok(())
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Wrap `text` in an OSC 8 terminal hyperlink when colors are enabled
pub fn hyperlink(url: &str, text: &str) -> String {
    if colors_enabled() && looks_like_url(url) {
        format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, text)
    } else {
        text.to_string()
    }
}

fn looks_like_url(s: &str) -> bool {
    let lower = s.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.")
}

/// Section heading used by the dashboard renderers
pub fn heading(title: &str) {
    println!("{}", style(title).bold());
    println!("{:-<64}", "");
}

/// Join a multi-select filter for display ("all" when empty)
pub fn describe_filter(selected: &[String]) -> String {
    if selected.is_empty() {
        "all".to_string()
    } else {
        selected.join(", ")
    }
}
