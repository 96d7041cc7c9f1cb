//! Table formatting for CLI output
//!
//! Tables here have dynamic headers (they mirror workbook sheets), so rows
//! are plain vectors of typed cells rather than keyed records.

use console::{measure_text_width, style};
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{hyperlink, truncate_str};
use crate::cli::OutputFormat;
use crate::core::sheet::{Cell, Sheet};
use crate::core::CleanRules;

/// Widest a text column may grow in the padded layout
pub const MAX_COLUMN_WIDTH: usize = 40;

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain text, truncated in the padded layout
    Text(String),
    /// Availability / delivery status with color coding
    Status(String),
    /// URL rendered as a terminal hyperlink
    Link(String),
    /// Count
    Number(usize),
    /// Whole percentage with color coding (> 50 green, else red)
    Percent(u32),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Convert a sheet cell, treating hyperlink columns as links
    pub fn from_cell(cell: &Cell, is_link: bool) -> Self {
        match cell {
            Cell::Empty => CellValue::Empty,
            c if is_link => CellValue::Link(c.to_string()),
            c => CellValue::Text(c.to_string()),
        }
    }

    /// Format for the padded terminal layout
    pub fn format_tsv(&self, width: usize) -> String {
        let text = truncate_str(&self.raw(), width);
        let styled = match self {
            CellValue::Text(_) => text.clone(),
            CellValue::Status(s) => status_style(s, &text),
            CellValue::Link(url) => hyperlink(url, &text),
            CellValue::Number(_) => style(&text).cyan().to_string(),
            CellValue::Percent(p) => percent_style(*p, &text),
            CellValue::Empty => style("-").dim().to_string(),
        };
        pad(&styled, width)
    }

    /// Format for markdown output
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Empty => "-".to_string(),
            CellValue::Link(url) if !url.is_empty() => format!("<{}>", url),
            other => other.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Get raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::Status(s) | CellValue::Link(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Percent(p) => format!("{}%", p),
            CellValue::Empty => String::new(),
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Empty => 1,
            other => other.raw().chars().count(),
        }
    }
}

/// Color a status by keyword: available/released green, back order yellow,
/// anything else left plain
pub fn status_style(status: &str, text: &str) -> String {
    let lower = status.to_lowercase();
    if lower.contains("available") || lower.contains("released") {
        style(text).green().to_string()
    } else if lower.contains("back") || lower.contains("pending") || lower.contains("split") {
        style(text).yellow().to_string()
    } else if lower.contains("not in inventory") || lower == "unknown" {
        style(text).red().to_string()
    } else {
        text.to_string()
    }
}

/// Color a percentage: above half green, otherwise red
pub fn percent_style(pct: u32, text: &str) -> String {
    if pct > 50 {
        style(text).green().bold().to_string()
    } else {
        style(text).red().bold().to_string()
    }
}

// `{:<width$}` counts escape codes, so pad on visible width
fn pad(s: &str, width: usize) -> String {
    let visible = measure_text_width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(visible)))
}

/// A table with dynamic headers
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<CellValue>) -> &mut Self {
        self.rows.push(cells);
        self
    }

    /// Mirror a sheet, rendering its hyperlink columns as links
    pub fn from_sheet(sheet: &Sheet, rules: &CleanRules) -> Self {
        let links: Vec<bool> = sheet.headers.iter().map(|h| rules.is_link_column(h)).collect();
        let mut table = Table::new(sheet.headers.iter().cloned());
        for row in &sheet.rows {
            table.row(
                row.iter()
                    .zip(&links)
                    .map(|(cell, &is_link)| CellValue::from_cell(cell, is_link))
                    .collect(),
            );
        }
        table
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output rows in the specified format
    ///
    /// JSON and YAML are produced from the view models by the commands, so
    /// they fall back to the padded layout here.
    pub fn output(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Csv => self.output_csv(),
            OutputFormat::Md => {
                println!("{}", self.to_markdown());
                Ok(())
            }
            OutputFormat::Tsv => {
                self.output_tsv();
                Ok(())
            }
            _ => {
                self.output_padded();
                Ok(())
            }
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let content = self
                    .rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                header.chars().count().max(content).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    fn output_padded(&self) {
        let widths = self.calculate_widths();

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| pad(&style(truncate_str(h, w)).bold().to_string(), w))
            .collect();
        println!("{}", header.join("  ").trim_end());

        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        println!("{}", "-".repeat(total));

        for row in &self.rows {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, &w)| row.get(i).unwrap_or(&CellValue::Empty).format_tsv(w))
                .collect();
            println!("{}", cells.join("  ").trim_end());
        }
    }

    fn output_tsv(&self) {
        println!("{}", self.headers.join("\t"));
        for row in &self.rows {
            let values: Vec<String> = row.iter().map(|c| c.raw().replace(['\t', '\n'], " ")).collect();
            println!("{}", values.join("\t"));
        }
    }

    fn output_csv(&self) -> Result<()> {
        let mut writer = csv::Writer::from_writer(std::io::stdout());
        writer.write_record(&self.headers).into_diagnostic()?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(CellValue::raw))
                .into_diagnostic()?;
        }
        writer.flush().into_diagnostic()?;
        Ok(())
    }

    pub fn to_markdown(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().map(CellValue::format_md));
        }
        builder.build().with(Style::markdown()).to_string()
    }
}
