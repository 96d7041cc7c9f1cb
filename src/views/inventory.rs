//! Inventory overview: availability KPIs and breakdowns of the parts table

use serde::Serialize;
use std::collections::HashMap;

use crate::core::bom::percent;
use crate::core::columns::{ColumnCandidates, Field};
use crate::core::natural::natural_cmp;
use crate::core::sheet::Sheet;
use crate::views::filter::{self, Count};

/// Categories shown in the distribution chart
pub const TOP_CATEGORIES: usize = 12;
/// Manufacturers shown in the manufacturer chart
pub const TOP_MANUFACTURERS: usize = 25;

/// Filters and search applied to the inventory
#[derive(Debug, Clone, Default)]
pub struct InventoryQuery {
    pub statuses: Vec<String>,
    pub categories: Vec<String>,
    pub search: Option<String>,
}

/// Inventory headers resolved for this workbook
#[derive(Debug, Clone, Default, Serialize)]
pub struct InventoryColumns {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub sub_category2: Option<String>,
    pub status: Option<String>,
    pub brand: Option<String>,
}

impl InventoryColumns {
    pub fn resolve(components: &Sheet, candidates: &ColumnCandidates) -> Self {
        Self {
            category: candidates.resolve_owned(components, Field::Category),
            sub_category: candidates.resolve_owned(components, Field::SubCategory),
            sub_category2: candidates.resolve_owned(components, Field::SubCategory2),
            status: candidates.resolve_owned(components, Field::Status),
            brand: candidates.resolve_owned(components, Field::Brand),
        }
    }
}

/// Headline numbers; `None` where the backing column is missing
#[derive(Debug, Clone, Default, Serialize)]
pub struct InventoryKpis {
    pub total_parts: usize,
    pub available: Option<usize>,
    pub availability_pct: u32,
    pub categories: Option<usize>,
    pub manufacturers: Option<usize>,
}

impl InventoryKpis {
    /// Availability above half the inventory is considered healthy
    pub fn is_healthy(&self) -> bool {
        self.availability_pct > 50
    }
}

/// Category > subcategory > subcategory 2 tree with row counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    pub label: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    pub columns: InventoryColumns,
    pub status_options: Vec<String>,
    pub category_options: Vec<String>,
    pub kpis: InventoryKpis,
    pub status_breakdown: Option<Vec<Count>>,
    pub category_distribution: Option<Vec<Count>>,
    pub top_manufacturers: Option<Vec<Count>>,
    pub hierarchy: Option<Vec<HierarchyNode>>,
    #[serde(skip)]
    pub rows: Sheet,
}

/// Build the inventory view
pub fn build(components: &Sheet, query: &InventoryQuery, candidates: &ColumnCandidates) -> InventoryView {
    let columns = InventoryColumns::resolve(components, candidates);

    let status_options = columns
        .status
        .as_deref()
        .map(|c| filter::options(components, c))
        .unwrap_or_default();
    let category_options = columns
        .category
        .as_deref()
        .map(|c| filter::options(components, c))
        .unwrap_or_default();

    let mut rows = components.clone();
    if let Some(col) = &columns.status {
        rows = filter::select(&rows, col, &query.statuses);
    }
    if let Some(col) = &columns.category {
        rows = filter::select(&rows, col, &query.categories);
    }
    if let Some(q) = &query.search {
        rows = filter::search(&rows, q, None);
    }

    let total_parts = rows.len();
    let available = columns
        .status
        .as_deref()
        .map(|c| filter::count_containing(&rows, c, "available"));

    let kpis = InventoryKpis {
        total_parts,
        available,
        availability_pct: percent(available.unwrap_or(0), total_parts),
        categories: columns.category.as_deref().map(|c| filter::n_unique(&rows, c)),
        manufacturers: columns.brand.as_deref().map(|c| filter::n_unique(&rows, c)),
    };

    let status_breakdown = columns
        .status
        .as_deref()
        .map(|c| filter::value_counts(&rows, c));

    let category_distribution = columns.category.as_deref().map(|c| {
        let mut counts = filter::value_counts(&rows, c);
        counts.truncate(TOP_CATEGORIES);
        counts
    });

    let top_manufacturers = columns.brand.as_deref().map(|c| {
        let mut counts = filter::value_counts(&rows, c);
        counts.truncate(TOP_MANUFACTURERS);
        counts
    });

    let hierarchy = match (&columns.category, &columns.sub_category) {
        (Some(cat), Some(sub)) => Some(hierarchy(&rows, cat, sub, columns.sub_category2.as_deref())),
        _ => None,
    };

    InventoryView {
        columns,
        status_options,
        category_options,
        kpis,
        status_breakdown,
        category_distribution,
        top_manufacturers,
        hierarchy,
        rows,
    }
}

/// Group rows into a category tree
///
/// Empty category cells read as "Unknown" and empty subcategories as
/// "General". The third level is only used when the column holds at least
/// one value; its empty cells read as "-".
pub fn hierarchy(rows: &Sheet, category: &str, sub: &str, sub2: Option<&str>) -> Vec<HierarchyNode> {
    let sub2 = sub2.filter(|c| rows.column(c).any(|cell| !cell.is_empty()));

    let mut tree: HashMap<String, HashMap<String, HashMap<String, usize>>> = HashMap::new();
    for i in 0..rows.len() {
        let level = |col: &str, fallback: &str| {
            rows.value(i, col)
                .map(|cell| filter::display_or(cell, fallback))
                .unwrap_or_else(|| fallback.to_string())
        };
        let leaf = match sub2 {
            Some(c) => level(c, "-"),
            None => String::new(),
        };
        *tree
            .entry(level(category, "Unknown"))
            .or_default()
            .entry(level(sub, "General"))
            .or_default()
            .entry(leaf)
            .or_insert(0) += 1;
    }

    let mut out: Vec<HierarchyNode> = tree
        .into_iter()
        .map(|(cat, subs)| {
            let children: Vec<HierarchyNode> = subs
                .into_iter()
                .map(|(sub, leaves)| {
                    let count = leaves.values().sum::<usize>();
                    let leaf_nodes: Vec<HierarchyNode> = leaves
                        .into_iter()
                        .filter(|(label, _)| !label.is_empty())
                        .map(|(label, count)| HierarchyNode {
                            label,
                            count,
                            children: Vec::new(),
                        })
                        .collect();
                    node(sub, count, leaf_nodes)
                })
                .collect();
            let count = children.iter().map(|n| n.count).sum::<usize>();
            node(cat, count, children)
        })
        .collect();

    sort_nodes(&mut out);
    out
}

fn node(label: String, count: usize, children: Vec<HierarchyNode>) -> HierarchyNode {
    let mut children = children;
    sort_nodes(&mut children);
    HierarchyNode {
        label,
        count,
        children,
    }
}

fn sort_nodes(nodes: &mut [HierarchyNode]) {
    nodes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| natural_cmp(&a.label, &b.label)));
}
