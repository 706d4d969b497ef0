use crate::analytics::{group_by, round2};
use crate::model::TableView;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// One calendar month of activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRow {
    /// `YYYY-MM`
    pub month: String,
    pub sales: f64,
    pub profit: f64,
    pub orders: usize,
}

/// Monthly sales, ascending by month
pub fn sales_trends(view: &TableView<'_>) -> Vec<TrendRow> {
    group_by(view, |r| (r.order_date.year(), r.order_date.month()))
        .into_iter()
        .map(|((year, month), acc)| TrendRow {
            month: format!("{:04}-{:02}", year, month),
            sales: round2(acc.sales),
            profit: round2(acc.profit),
            orders: acc.orders(),
        })
        .collect()
}
