//! Delivery tracking: release progress of ordered sets

use serde::Serialize;
use std::collections::HashMap;

use crate::core::bom::percent;
use crate::core::columns::{ColumnCandidates, Field};
use crate::core::natural::natural_cmp;
use crate::core::sheet::Sheet;
use crate::views::filter::{self, Count};
use crate::views::ViewError;

/// Filters and search applied to the delivery table
#[derive(Debug, Clone, Default)]
pub struct DeliveryQuery {
    pub sets: Vec<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryColumns {
    pub set: String,
    pub status: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryKpis {
    pub items: usize,
    pub released: usize,
    pub pending: usize,
    pub released_pct: u32,
}

/// Line counts of one set, split by status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetComposition {
    pub set: String,
    pub statuses: Vec<Count>,
}

impl SetComposition {
    pub fn total(&self) -> usize {
        self.statuses.iter().map(|c| c.count).sum()
    }
}

/// A line that is not released yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryException {
    pub set: String,
    pub status: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryView {
    pub columns: DeliveryColumns,
    pub set_options: Vec<String>,
    pub kpis: DeliveryKpis,
    pub composition: Vec<SetComposition>,
    pub exceptions: Vec<DeliveryException>,
    #[serde(skip)]
    pub rows: Sheet,
}

fn is_released(status: &str) -> bool {
    status.to_lowercase().contains("released")
}

/// Build the delivery view
///
/// Fails with [`ViewError::DataMissing`] when the sets table is empty or has
/// no set identifier or status column.
pub fn build(sets: &Sheet, query: &DeliveryQuery, candidates: &ColumnCandidates) -> Result<DeliveryView, ViewError> {
    let missing = || {
        ViewError::missing(
            "Delivery",
            "the workbook needs a sheet named like 'Set Delivery' with 'Set No' and 'Final Status' columns",
        )
    };
    if sets.is_empty() {
        return Err(missing());
    }
    let set_col = candidates.resolve_owned(sets, Field::SetNo).ok_or_else(missing)?;
    let status_col = candidates
        .resolve_owned(sets, Field::FinalStatus)
        .ok_or_else(missing)?;
    let link_col = candidates.resolve_owned(sets, Field::Link);

    let set_options = filter::natural_options(sets, &set_col);

    let mut rows = filter::select(sets, &set_col, &query.sets);
    if let Some(q) = &query.search {
        rows = filter::search(&rows, q, None);
    }

    let items = rows.len();
    let released = filter::count_containing(&rows, &status_col, "released");
    let kpis = DeliveryKpis {
        items,
        released,
        pending: items - released,
        released_pct: percent(released, items),
    };

    let composition = composition(&rows, &set_col, &status_col);

    let exceptions = (0..rows.len())
        .filter(|&i| !is_released(&rows.text(i, &status_col)))
        .map(|i| DeliveryException {
            set: rows.text(i, &set_col),
            status: rows.text(i, &status_col),
            link: link_col
                .as_deref()
                .map(|c| rows.text(i, c))
                .filter(|l| !l.is_empty()),
        })
        .collect();

    Ok(DeliveryView {
        columns: DeliveryColumns {
            set: set_col,
            status: status_col,
            link: link_col,
        },
        set_options,
        kpis,
        composition,
        exceptions,
        rows,
    })
}

/// Group rows by (set, status), sets in natural order
pub fn composition(rows: &Sheet, set_col: &str, status_col: &str) -> Vec<SetComposition> {
    let mut groups: HashMap<String, HashMap<String, usize>> = HashMap::new();
    for i in 0..rows.len() {
        *groups
            .entry(rows.text(i, set_col))
            .or_default()
            .entry(rows.text(i, status_col))
            .or_insert(0) += 1;
    }

    let mut out: Vec<SetComposition> = groups
        .into_iter()
        .map(|(set, statuses)| {
            let mut statuses: Vec<Count> = statuses
                .into_iter()
                .map(|(label, count)| Count { label, count })
                .collect();
            statuses.sort_by(|a, b| natural_cmp(&a.label, &b.label));
            SetComposition { set, statuses }
        })
        .collect();
    out.sort_by(|a, b| natural_cmp(&a.set, &b.set));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sheet::Cell;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sets() -> Sheet {
        let row = |set: &str, status: &str, name: &str, link: &str| {
            vec![text(set), text(status), text(name), text(link)]
        };
        Sheet::from_rows(
            "Set Delivery",
            vec!["Set No".into(), "Final Status".into(), "Name".into(), "Link".into()],
            vec![
                row("Set 10", "Released", "Servo", "https://x/1"),
                row("Set 2", "Backorder", "Driver", "https://x/2"),
                row("Set 1", "Released", "Sensor", ""),
                row("Set 2", "Split", "Servo", ""),
            ],
        )
    }

    #[test]
    fn test_kpis() {
        let view = build(&sets(), &DeliveryQuery::default(), &ColumnCandidates::default()).unwrap();
        assert_eq!(view.kpis.items, 4);
        assert_eq!(view.kpis.released, 2);
        assert_eq!(view.kpis.pending, 2);
        assert_eq!(view.kpis.released_pct, 50);
    }

    #[test]
    fn test_set_options_natural_order() {
        let view = build(&sets(), &DeliveryQuery::default(), &ColumnCandidates::default()).unwrap();
        assert_eq!(view.set_options, vec!["Set 1", "Set 2", "Set 10"]);
        let order: Vec<&str> = view.composition.iter().map(|c| c.set.as_str()).collect();
        assert_eq!(order, vec!["Set 1", "Set 2", "Set 10"]);
        assert_eq!(view.composition[1].total(), 2);
    }

    #[test]
    fn test_exceptions() {
        let view = build(&sets(), &DeliveryQuery::default(), &ColumnCandidates::default()).unwrap();
        assert_eq!(
            view.exceptions,
            vec![
                DeliveryException {
                    set: "Set 2".into(),
                    status: "Backorder".into(),
                    link: Some("https://x/2".into()),
                },
                DeliveryException {
                    set: "Set 2".into(),
                    status: "Split".into(),
                    link: None,
                },
            ]
        );
    }

    #[test]
    fn test_set_filter_and_search() {
        let query = DeliveryQuery {
            sets: vec!["set 2".into()],
            search: Some("driver".into()),
        };
        let view = build(&sets(), &query, &ColumnCandidates::default()).unwrap();
        assert_eq!(view.kpis.items, 1);
        assert_eq!(view.kpis.released_pct, 0);
        // options are not narrowed by the filter
        assert_eq!(view.set_options.len(), 3);
    }

    #[test]
    fn test_empty_selection_result() {
        let query = DeliveryQuery {
            sets: vec![],
            search: Some("nothing matches".into()),
        };
        let view = build(&sets(), &query, &ColumnCandidates::default()).unwrap();
        assert_eq!(view.kpis.items, 0);
        assert_eq!(view.kpis.released_pct, 0);
        assert!(view.composition.is_empty());
        assert!(view.exceptions.is_empty());
    }

    #[test]
    fn test_missing_sheet_reports_data_missing() {
        let err = build(&Sheet::empty(), &DeliveryQuery::default(), &ColumnCandidates::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Delivery data missing");
    }

    #[test]
    fn test_missing_set_column_reports_data_missing() {
        let sheet = Sheet::from_rows(
            "Delivery",
            vec!["Final Status".into()],
            vec![vec![text("Released")]],
        );
        assert!(build(&sheet, &DeliveryQuery::default(), &ColumnCandidates::default()).is_err());
    }

    #[test]
    fn test_plain_status_column_is_accepted() {
        let sheet = Sheet::from_rows(
            "Delivery",
            vec!["set".into(), "status".into()],
            vec![vec![text("Set 1"), text("Released")]],
        );
        let view = build(&sheet, &DeliveryQuery::default(), &ColumnCandidates::default()).unwrap();
        assert_eq!(view.columns.set, "set");
        assert_eq!(view.kpis.released, 1);
    }
}
