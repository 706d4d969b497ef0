//! Dimension Breakdowns
//!
//! Sales, profit and distinct counts grouped by category, region or segment.

use crate::analytics::{group_by, round2};
use crate::model::TableView;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRow {
    pub region: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub segment: String,
    pub sales: f64,
    pub profit: f64,
    pub customers: usize,
    pub orders: usize,
}

pub fn sales_by_category(view: &TableView<'_>) -> Vec<CategoryRow> {
    group_by(view, |r| r.category.as_str())
        .into_iter()
        .map(|(category, acc)| CategoryRow {
            category: category.to_string(),
            sales: round2(acc.sales),
            profit: round2(acc.profit),
            quantity: acc.quantity,
            orders: acc.orders(),
        })
        .collect()
}

pub fn sales_by_region(view: &TableView<'_>) -> Vec<RegionRow> {
    group_by(view, |r| r.region.as_str())
        .into_iter()
        .map(|(region, acc)| RegionRow {
            region: region.to_string(),
            sales: round2(acc.sales),
            profit: round2(acc.profit),
            quantity: acc.quantity,
            orders: acc.orders(),
        })
        .collect()
}

pub fn segment_analysis(view: &TableView<'_>) -> Vec<SegmentRow> {
    group_by(view, |r| r.segment.as_str())
        .into_iter()
        .map(|(segment, acc)| SegmentRow {
            segment: segment.to_string(),
            sales: round2(acc.sales),
            profit: round2(acc.profit),
            customers: acc.customers(),
            orders: acc.orders(),
        })
        .collect()
}
