use crate::analytics::{percentage, round2, totals};
use crate::model::TableView;
use serde::{Deserialize, Serialize};

/// Headline metrics for a selection of rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_orders: usize,
    pub total_customers: usize,
    pub avg_order_value: f64,
    pub profit_margin: f64,
}

pub fn overview(view: &TableView<'_>) -> Overview {
    let acc = totals(view);
    let orders = acc.orders();

    let avg_order_value = if orders == 0 {
        0.0
    } else {
        round2(acc.sales / orders as f64)
    };

    Overview {
        total_sales: round2(acc.sales),
        total_profit: round2(acc.profit),
        total_orders: orders,
        total_customers: acc.customers(),
        avg_order_value,
        profit_margin: percentage(acc.profit, acc.sales),
    }
}
