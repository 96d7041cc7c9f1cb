//! Row filters shared by the dashboard views

use serde::Serialize;
use std::collections::HashMap;

use crate::core::natural::natural_cmp;
use crate::core::sheet::{Cell, Sheet};

/// Keep rows where any searched column contains `query` (case-insensitive)
///
/// `columns = None` searches every column. A blank query keeps all rows.
pub fn search(sheet: &Sheet, query: &str, columns: Option<&[String]>) -> Sheet {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return sheet.clone();
    }

    let indices: Vec<usize> = match columns {
        Some(cols) => cols.iter().filter_map(|c| sheet.column_index(c)).collect(),
        None => (0..sheet.headers.len()).collect(),
    };

    sheet.filter_rows(|row| {
        indices
            .iter()
            .filter_map(|&i| row.get(i))
            .any(|cell| cell.to_string().to_lowercase().contains(&needle))
    })
}

/// Keep rows whose `column` equals one of `selected` (case-insensitive)
///
/// An empty selection keeps all rows.
pub fn select(sheet: &Sheet, column: &str, selected: &[String]) -> Sheet {
    if selected.is_empty() {
        return sheet.clone();
    }
    let Some(idx) = sheet.column_index(column) else {
        return sheet.clone();
    };

    let wanted: Vec<String> = selected.iter().map(|s| s.trim().to_lowercase()).collect();
    sheet.filter_rows(|row| {
        row.get(idx)
            .is_some_and(|cell| wanted.contains(&cell.to_string().to_lowercase()))
    })
}

/// Sorted unique values of a column (filter options)
pub fn options(sheet: &Sheet, column: &str) -> Vec<String> {
    let mut values = sheet.unique_values(column);
    values.sort();
    values
}

/// Unique values of a column in natural order
pub fn natural_options(sheet: &Sheet, column: &str) -> Vec<String> {
    let mut values = sheet.unique_values(column);
    values.sort_by(|a, b| natural_cmp(a, b));
    values
}

/// A label with its row count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub label: String,
    pub count: usize,
}

impl Count {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Row counts per value, most frequent first (ties in natural order)
pub fn value_counts(sheet: &Sheet, column: &str) -> Vec<Count> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for cell in sheet.column(column) {
        *counts.entry(display_or(cell, "Unknown")).or_insert(0) += 1;
    }

    let mut out: Vec<Count> = counts
        .into_iter()
        .map(|(label, count)| Count { label, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| natural_cmp(&a.label, &b.label)));
    out
}

/// Number of distinct values in a column
pub fn n_unique(sheet: &Sheet, column: &str) -> usize {
    sheet.unique_values(column).len()
}

/// Rows whose column contains `needle` (case-insensitive)
pub fn count_containing(sheet: &Sheet, column: &str, needle: &str) -> usize {
    let needle = needle.to_lowercase();
    sheet
        .column(column)
        .filter(|c| c.to_string().to_lowercase().contains(&needle))
        .count()
}

/// Display value of a cell, with a fallback for empty cells
pub fn display_or(cell: &Cell, fallback: &str) -> String {
    if cell.is_empty() {
        fallback.to_string()
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sheet() -> Sheet {
        Sheet::from_rows(
            "S",
            vec!["Name".into(), "Status".into(), "Set".into()],
            vec![
                vec![text("Servo Motor"), text("Available"), text("Set 10")],
                vec![text("Motor Driver"), text("Backorder"), text("Set 2")],
                vec![text("Ultrasonic Sensor"), text("Available"), text("Set 1")],
            ],
        )
    }

    #[test]
    fn test_search_single_row_case_insensitive() {
        let result = search(&sheet(), "ULTRASONIC", None);
        assert_eq!(result.len(), 1);
        assert_eq!(result.text(0, "Name"), "Ultrasonic Sensor");
    }

    #[test]
    fn test_search_blank_keeps_all() {
        assert_eq!(search(&sheet(), "  ", None).len(), 3);
    }

    #[test]
    fn test_search_limited_columns() {
        let cols = vec!["Status".to_string()];
        assert_eq!(search(&sheet(), "motor", Some(&cols)).len(), 0);
        assert_eq!(search(&sheet(), "motor", None).len(), 2);
    }

    #[test]
    fn test_search_is_literal() {
        assert_eq!(search(&sheet(), "Set.1", None).len(), 0);
    }

    #[test]
    fn test_select() {
        let s = sheet();
        assert_eq!(select(&s, "Status", &["available".to_string()]).len(), 2);
        assert_eq!(select(&s, "Status", &[]).len(), 3);
        assert_eq!(select(&s, "Missing", &["x".to_string()]).len(), 3);
    }

    #[test]
    fn test_options() {
        assert_eq!(options(&sheet(), "Status"), vec!["Available", "Backorder"]);
        assert_eq!(natural_options(&sheet(), "Set"), vec!["Set 1", "Set 2", "Set 10"]);
    }

    #[test]
    fn test_value_counts_order() {
        let counts = value_counts(&sheet(), "Status");
        assert_eq!(
            counts,
            vec![Count::new("Available", 2), Count::new("Backorder", 1)]
        );
    }

    #[test]
    fn test_counting_helpers() {
        assert_eq!(n_unique(&sheet(), "Status"), 2);
        assert_eq!(count_containing(&sheet(), "Status", "avail"), 2);
        assert_eq!(count_containing(&sheet(), "Missing", "avail"), 0);
    }
}
