//! In-memory tabular data loaded from a workbook sheet
//!
//! A [`Sheet`] is a flat, row-aligned table: a list of headers and rows of
//! typed [`Cell`]s. Every row has exactly as many cells as there are headers.

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A single typed spreadsheet value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Date or date-time cell; never counted as text
    DateTime(NaiveDateTime),
    Duration(TimeDelta),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Cell::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => {
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::DateTime(dt) => {
                if dt.time().num_seconds_from_midnight() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            Cell::Duration(d) => {
                let secs = d.num_seconds();
                let sign = if secs < 0 { "-" } else { "" };
                let secs = secs.abs();
                write!(f, "{}{}:{:02}:{:02}", sign, secs / 3600, secs / 60 % 60, secs % 60)
            }
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Float(v) => serializer.serialize_f64(*v),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::DateTime(_) | Cell::Duration(_) => serializer.collect_str(self),
        }
    }
}

/// A named table with normalized headers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Build a sheet from a header row and data rows
    ///
    /// Headers are trimmed, blank headers become `Unnamed: N` and repeated
    /// headers get a `.1`, `.2`, ... suffix. Rows are padded or truncated to
    /// the header width and fully empty rows are dropped.
    pub fn from_rows(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let headers = normalize_headers(headers);
        let width = headers.len();

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .collect();

        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// An empty, unnamed sheet (used when a logical table is absent)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index of the column with exactly this header
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Iterate over the cells of a column (empty iterator if absent)
    pub fn column<'a>(&'a self, header: &str) -> impl Iterator<Item = &'a Cell> + 'a {
        let idx = self.column_index(header);
        self.rows
            .iter()
            .filter_map(move |row| idx.and_then(|i| row.get(i)))
    }

    /// Cell at (row, header)
    pub fn value(&self, row: usize, header: &str) -> Option<&Cell> {
        let idx = self.column_index(header)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Display string of a cell, empty if the row or column is absent
    pub fn text(&self, row: usize, header: &str) -> String {
        self.value(row, header).map(|c| c.to_string()).unwrap_or_default()
    }

    /// A new sheet with the same headers, keeping rows that match
    pub fn filter_rows<F>(&self, mut keep: F) -> Sheet
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Sheet {
            name: self.name.clone(),
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Whether any cell of the column is text
    pub fn is_text_column(&self, idx: usize) -> bool {
        self.rows
            .iter()
            .any(|row| row.get(idx).is_some_and(Cell::is_text))
    }

    /// Unique display values of a column, in first-seen order
    pub fn unique_values(&self, header: &str) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.column(header)
            .map(|c| c.to_string())
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }
}

/// Rows of a sheet serialized as header-ordered records
pub struct Records<'a>(&'a Sheet);

impl Sheet {
    /// Serialize rows as `[{header: value, ...}, ...]`
    pub fn records(&self) -> Records<'_> {
        Records(self)
    }
}

struct Record<'a> {
    headers: &'a [String],
    row: &'a [Cell],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (header, cell) in self.headers.iter().zip(self.row) {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
        for row in &self.0.rows {
            seq.serialize_element(&Record {
                headers: &self.0.headers,
                row,
            })?;
        }
        seq.end()
    }
}

fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());

    for (i, raw) in headers.into_iter().enumerate() {
        let trimmed = raw.trim();
        let mut name = if trimmed.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            trimmed.to_string()
        };

        // A generated `name.n` may itself be taken, so keep suffixing
        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            name = format!("{}.{}", name, count);
            count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), count + 1);
        out.push(name);
    }

    out
}
