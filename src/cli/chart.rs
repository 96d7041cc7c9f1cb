//! Text charts for the terminal dashboards

use console::style;

use crate::cli::helpers::truncate_str;
use crate::cli::table::percent_style;
use crate::views::Count;

const LABEL_WIDTH: usize = 24;
pub const BAR_WIDTH: usize = 30;

/// Length of a bar for `value` scaled against `max`
pub fn bar_len(value: usize, max: usize, width: usize) -> usize {
    if max == 0 || value == 0 {
        return 0;
    }
    // non-zero values always get at least one block
    ((value * width) / max).max(1)
}

/// Horizontal bar chart, one line per count
pub fn bar_chart(counts: &[Count], width: usize) {
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
    for c in counts {
        let bar = "█".repeat(bar_len(c.count, max, width));
        println!(
            "  {:<label$} {} {}",
            truncate_str(&c.label, LABEL_WIDTH),
            style(bar).cyan(),
            c.count,
            label = LABEL_WIDTH
        );
    }
}

/// Progress gauge such as `[██████░░░░░░░░░░░░░░] 33%`
pub fn gauge(pct: u32, width: usize) -> String {
    let filled = (pct.min(100) as usize * width) / 100;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(width - filled));
    format!("[{}] {}", bar, percent_style(pct, &format!("{}%", pct)))
}

/// Single stacked bar splitting a total by status, e.g. `Set 2  ██▒▒  2`
pub fn stacked_line(label: &str, parts: &[Count], scale_max: usize, width: usize) -> String {
    let mut bar = String::new();
    for part in parts {
        let len = bar_len(part.count, scale_max, width);
        let lower = part.label.to_lowercase();
        let segment = if lower.contains("released") {
            style("█".repeat(len)).green().to_string()
        } else {
            style("▒".repeat(len)).yellow().to_string()
        };
        bar.push_str(&segment);
    }
    let total: usize = parts.iter().map(|p| p.count).sum();
    format!(
        "  {:<label$} {} {}",
        truncate_str(label, LABEL_WIDTH),
        bar,
        total,
        label = LABEL_WIDTH
    )
}
