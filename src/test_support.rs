//! Shared fixtures for unit tests

use crate::model::{SalesRecord, SalesTable};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Minimal record dated 2023-01-01 with the given identity and amounts
pub fn record(order_id: &str, region: &str, category: &str, sales: f64, profit: f64) -> SalesRecord {
    SalesRecord {
        order_id: order_id.to_string(),
        order_date: date(2023, 1, 1),
        ship_date: None,
        customer_id: format!("CUST-{}", order_id),
        customer_name: "Test Customer".to_string(),
        segment: "Consumer".to_string(),
        region: region.to_string(),
        state: String::new(),
        category: category.to_string(),
        sub_category: "General".to_string(),
        product_name: "Widget".to_string(),
        sales,
        profit,
        quantity: 1,
        discount: 0.0,
    }
}

/// Five line items across three orders, three customers and three regions
pub fn sample_table() -> SalesTable {
    #[allow(clippy::type_complexity)]
    let rows: [(&str, (i32, u32, u32), &str, &str, &str, &str, &str, &str, &str, &str, f64, i64, f64, f64); 5] = [
        ("ORD-001", (2023, 1, 15), "CUST-001", "John Doe", "Consumer", "New York", "East", "Technology", "Phones", "iPhone", 500.0, 1, 0.0, 100.0),
        ("ORD-001", (2023, 1, 15), "CUST-001", "John Doe", "Consumer", "New York", "East", "Office Supplies", "Paper", "A4 Paper", 50.0, 5, 0.1, 10.0),
        ("ORD-002", (2023, 2, 20), "CUST-002", "Jane Smith", "Corporate", "California", "West", "Furniture", "Chairs", "Office Chair", 300.0, 1, 0.2, -20.0),
        ("ORD-003", (2023, 3, 10), "CUST-003", "Bob Wilson", "Home Office", "Illinois", "Central", "Technology", "Computers", "Laptop", 1000.0, 1, 0.0, 200.0),
        ("ORD-003", (2023, 3, 10), "CUST-003", "Bob Wilson", "Home Office", "Illinois", "Central", "Office Supplies", "Binders", "Ring Binder", 25.0, 10, 0.15, 5.0),
    ];

    rows.into_iter()
        .map(
            |(order_id, (y, m, d), customer_id, customer_name, segment, state, region, category, sub_category, product_name, sales, quantity, discount, profit)| {
                let order_date = date(y, m, d);
                SalesRecord {
                    order_id: order_id.to_string(),
                    order_date,
                    ship_date: order_date.checked_add_days(chrono::Days::new(5)),
                    customer_id: customer_id.to_string(),
                    customer_name: customer_name.to_string(),
                    segment: segment.to_string(),
                    region: region.to_string(),
                    state: state.to_string(),
                    category: category.to_string(),
                    sub_category: sub_category.to_string(),
                    product_name: product_name.to_string(),
                    sales,
                    profit,
                    quantity,
                    discount,
                }
            },
        )
        .collect()
}
