//! Best-effort cleanup of workbook text
//!
//! Text columns are trimmed and title-cased, spreadsheet placeholders such
//! as `nan` become `Unknown`, and manufacturer spellings are folded onto a
//! canonical name. Hyperlink columns are left untouched.

use std::collections::BTreeMap;

use crate::core::sheet::{Cell, Sheet};
use crate::core::Config;

/// Placeholder tokens replaced after title-casing
pub const DEFAULT_PLACEHOLDERS: &[&str] = &["Nan", "nan", "None"];

/// Canonical manufacturer names keyed by their title-cased spelling
pub const DEFAULT_BRAND_SYNONYMS: &[(&str, &str)] = &[
    ("Dfrobot", "DFRobot"),
    ("Dfr", "DFRobot"),
    ("Adafruit", "Adafruit"),
    ("Pololu", "Pololu"),
    ("Sparkfun", "SparkFun"),
    ("Arduino", "Arduino"),
    ("Espressif", "Espressif"),
    ("Seeed", "Seeed Studio"),
    ("Stmicroelectronics", "STMicroelectronics"),
];

/// Headers (case-insensitive) that hold manufacturer names
pub const BRAND_COLUMNS: &[&str] = &["mfg", "manufacturer", "brand"];

/// Rules applied by [`clean_sheet`]
#[derive(Debug, Clone)]
pub struct CleanRules {
    pub placeholders: Vec<String>,
    pub replacement: String,
    pub brand_synonyms: BTreeMap<String, String>,
    pub brand_columns: Vec<String>,
    /// Columns whose header contains this (case-insensitive) are hyperlinks
    pub link_marker: String,
}

impl Default for CleanRules {
    fn default() -> Self {
        Self {
            placeholders: DEFAULT_PLACEHOLDERS.iter().map(|s| s.to_string()).collect(),
            replacement: "Unknown".to_string(),
            brand_synonyms: DEFAULT_BRAND_SYNONYMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            brand_columns: BRAND_COLUMNS.iter().map(|s| s.to_string()).collect(),
            link_marker: "link".to_string(),
        }
    }
}

impl CleanRules {
    /// Default rules extended with configured synonyms and placeholders
    pub fn from_config(config: &Config) -> Self {
        let mut rules = Self::default();
        for (from, to) in &config.brand_synonyms {
            rules.brand_synonyms.insert(from.clone(), to.clone());
        }
        for token in &config.placeholders {
            if !rules.placeholders.contains(token) {
                rules.placeholders.push(token.clone());
            }
        }
        rules
    }

    pub fn is_link_column(&self, header: &str) -> bool {
        header
            .to_lowercase()
            .contains(&self.link_marker.to_lowercase())
    }

    pub fn is_brand_column(&self, header: &str) -> bool {
        let lower = header.to_lowercase();
        self.brand_columns.iter().any(|c| *c == lower)
    }

    fn normalize_text(&self, raw: &str) -> String {
        let titled = title_case(raw.trim());
        if self.placeholders.iter().any(|p| *p == titled) {
            self.replacement.clone()
        } else {
            titled
        }
    }
}

/// Title-case a string: the first cased letter after any uncased character
/// is uppercased, all other letters are lowercased.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;

    for ch in s.chars() {
        let cased = ch.is_uppercase() || ch.is_lowercase();
        if prev_cased {
            out.extend(ch.to_lowercase());
        } else if cased {
            // Only the first char of a multi-char expansion stays upper (ß -> Ss)
            let mut upper = ch.to_uppercase();
            out.extend(upper.next());
            out.extend(upper.flat_map(char::to_lowercase));
        } else {
            out.push(ch);
        }
        prev_cased = cased;
    }

    out
}

/// Clean a sheet in place
pub fn clean_sheet(sheet: &mut Sheet, rules: &CleanRules) {
    let text_columns: Vec<usize> = (0..sheet.headers.len())
        .filter(|&i| !rules.is_link_column(&sheet.headers[i]) && sheet.is_text_column(i))
        .collect();

    let brand_columns: Vec<usize> = (0..sheet.headers.len())
        .filter(|&i| rules.is_brand_column(&sheet.headers[i]))
        .collect();

    for row in &mut sheet.rows {
        for &i in &text_columns {
            let raw = match &row[i] {
                Cell::Empty => "nan".to_string(),
                other => other.to_string(),
            };
            row[i] = Cell::Text(rules.normalize_text(&raw));
        }

        for &i in &brand_columns {
            if let Cell::Text(value) = &row[i] {
                if let Some(canonical) = rules.brand_synonyms.get(value) {
                    row[i] = Cell::Text(canonical.clone());
                }
            }
        }
    }
}
