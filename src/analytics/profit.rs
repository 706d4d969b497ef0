use crate::analytics::{group_by, percentage, round2};
use crate::model::TableView;
use serde::{Deserialize, Serialize};

/// Profitability of one sub-category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitRow {
    pub category: String,
    pub sub_category: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    /// Percent; 0.0 when sales are exactly zero
    pub profit_margin: f64,
}

/// Profit analysis grouped by (category, sub-category)
pub fn profit_analysis(view: &TableView<'_>) -> Vec<ProfitRow> {
    group_by(view, |r| (r.category.as_str(), r.sub_category.as_str()))
        .into_iter()
        .map(|((category, sub_category), acc)| ProfitRow {
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            sales: round2(acc.sales),
            profit: round2(acc.profit),
            quantity: acc.quantity,
            profit_margin: percentage(acc.profit, acc.sales),
        })
        .collect()
}
