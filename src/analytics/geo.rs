//! State-level Aggregation
//!
//! Rows are grouped by full state name and tagged with the USPS code. States outside
//! the lookup (50 states plus DC) are left out of the result.

use crate::analytics::{group_by, round2};
use crate::model::TableView;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static! {
    static ref STATE_CODES: HashMap<&'static str, &'static str> = [
        ("Alabama", "AL"),
        ("Alaska", "AK"),
        ("Arizona", "AZ"),
        ("Arkansas", "AR"),
        ("California", "CA"),
        ("Colorado", "CO"),
        ("Connecticut", "CT"),
        ("Delaware", "DE"),
        ("Florida", "FL"),
        ("Georgia", "GA"),
        ("Hawaii", "HI"),
        ("Idaho", "ID"),
        ("Illinois", "IL"),
        ("Indiana", "IN"),
        ("Iowa", "IA"),
        ("Kansas", "KS"),
        ("Kentucky", "KY"),
        ("Louisiana", "LA"),
        ("Maine", "ME"),
        ("Maryland", "MD"),
        ("Massachusetts", "MA"),
        ("Michigan", "MI"),
        ("Minnesota", "MN"),
        ("Mississippi", "MS"),
        ("Missouri", "MO"),
        ("Montana", "MT"),
        ("Nebraska", "NE"),
        ("Nevada", "NV"),
        ("New Hampshire", "NH"),
        ("New Jersey", "NJ"),
        ("New Mexico", "NM"),
        ("New York", "NY"),
        ("North Carolina", "NC"),
        ("North Dakota", "ND"),
        ("Ohio", "OH"),
        ("Oklahoma", "OK"),
        ("Oregon", "OR"),
        ("Pennsylvania", "PA"),
        ("Rhode Island", "RI"),
        ("South Carolina", "SC"),
        ("South Dakota", "SD"),
        ("Tennessee", "TN"),
        ("Texas", "TX"),
        ("Utah", "UT"),
        ("Vermont", "VT"),
        ("Virginia", "VA"),
        ("Washington", "WA"),
        ("West Virginia", "WV"),
        ("Wisconsin", "WI"),
        ("Wyoming", "WY"),
        ("District of Columbia", "DC"),
    ]
    .into_iter()
    .collect();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRow {
    pub state: String,
    pub state_code: String,
    pub sales: f64,
    pub profit: f64,
    pub orders: usize,
}

/// Two-letter postal code for a full state name
pub fn state_code(name: &str) -> Option<&'static str> {
    STATE_CODES.get(name).copied()
}

pub fn state_sales(view: &TableView<'_>) -> Vec<StateRow> {
    group_by(view, |r| r.state.as_str())
        .into_iter()
        .filter_map(|(state, acc)| {
            let code = state_code(state)?;
            Some(StateRow {
                state: state.to_string(),
                state_code: code.to_string(),
                sales: round2(acc.sales),
                profit: round2(acc.profit),
                orders: acc.orders(),
            })
        })
        .collect()
}
