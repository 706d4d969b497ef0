//! Aggregation Engine
//!
//! Every view is a typed reduction over a `TableView`: a key extractor, a
//! `GroupTotals` accumulator and a row constructor. Groups are kept in a `BTreeMap`
//! so output is ordered by key.
//!
//! Currency values and percentages are rounded to two decimals, half away from
//! zero (`f64::round` on the value scaled by 100). Counts and quantities are exact.

pub mod breakdown;
pub mod geo;
pub mod options;
pub mod overview;
pub mod profit;
pub mod trends;

pub use breakdown::{sales_by_category, sales_by_region, segment_analysis, CategoryRow, RegionRow, SegmentRow};
pub use geo::{state_code, state_sales, StateRow};
pub use options::{filter_options, DateRange, FilterOptions};
pub use overview::{overview, Overview};
pub use profit::{profit_analysis, ProfitRow};
pub use trends::{sales_trends, TrendRow};

use crate::model::{SalesRecord, TableView};
use std::collections::{BTreeMap, HashSet};

/// Round to two decimal places, half away from zero. Never returns -0.0.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// `numerator / denominator * 100`, rounded; zero when the denominator is exactly zero
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        round2(numerator / denominator * 100.0)
    }
}

/// Running sums and distinct counts for one group
#[derive(Debug, Default)]
pub(crate) struct GroupTotals<'a> {
    pub rows: usize,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    orders: HashSet<&'a str>,
    customers: HashSet<&'a str>,
}

impl<'a> GroupTotals<'a> {
    pub fn add(&mut self, record: &'a SalesRecord) {
        self.rows += 1;
        self.sales += record.sales;
        self.profit += record.profit;
        self.quantity += record.quantity;
        // Blank identifiers are treated as missing and not counted
        if !record.order_id.is_empty() {
            self.orders.insert(record.order_id.as_str());
        }
        if !record.customer_id.is_empty() {
            self.customers.insert(record.customer_id.as_str());
        }
    }

    pub fn orders(&self) -> usize {
        self.orders.len()
    }

    pub fn customers(&self) -> usize {
        self.customers.len()
    }
}

pub(crate) fn totals<'a>(view: &TableView<'a>) -> GroupTotals<'a> {
    let mut acc = GroupTotals::default();
    for record in view.iter() {
        acc.add(record);
    }
    acc
}

pub(crate) fn group_by<'a, K, F>(view: &TableView<'a>, key: F) -> BTreeMap<K, GroupTotals<'a>>
where
    K: Ord,
    F: Fn(&'a SalesRecord) -> K,
{
    let mut groups: BTreeMap<K, GroupTotals<'a>> = BTreeMap::new();
    for record in view.iter() {
        groups.entry(key(record)).or_default().add(record);
    }
    groups
}
