//! Natural ("human") ordering for labels containing numbers
//!
//! `"Set 2"` sorts before `"Set 10"`: a label is split into alternating
//! text and digit runs, text compared case-insensitively and digit runs
//! compared by numeric value.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit regex"));

/// One run of a natural sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Digits with leading zeros stripped (so length orders magnitude)
    Number(String),
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Number(a), Segment::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            // Keys always alternate text/number from a leading text run,
            // so mixed comparisons only arise past the end of one key.
            (Segment::Text(_), Segment::Number(_)) => Ordering::Less,
            (Segment::Number(_), Segment::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key for natural ordering
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Segment>);

/// Split a label into its natural sort key
///
/// The key always starts with a (possibly empty) text run, so digit runs of
/// two keys line up position by position.
pub fn natural_key(s: &str) -> NaturalKey {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in DIGITS.find_iter(s) {
        segments.push(Segment::Text(s[last..m.start()].to_lowercase()));
        let digits = m.as_str().trim_start_matches('0');
        segments.push(Segment::Number(if digits.is_empty() {
            "0".to_string()
        } else {
            digits.to_string()
        }));
        last = m.end();
    }
    segments.push(Segment::Text(s[last..].to_lowercase()));

    NaturalKey(segments)
}

/// Total order: natural key first, raw string as tie-break
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b)).then_with(|| a.cmp(b))
}

/// Sort labels in natural order
pub fn natural_sort<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}
