//! Sales Data Model
//!
//! `SalesTable` owns the ingested rows and is never mutated after construction.
//! Filtering produces a `TableView`, a borrowed subset of rows in source order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One sales order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub ship_date: Option<NaiveDate>,
    pub customer_id: String,
    pub customer_name: String,
    pub segment: String,
    pub region: String,
    /// Full state name, empty when the snapshot carries no state column
    pub state: String,
    pub category: String,
    pub sub_category: String,
    pub product_name: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    pub discount: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// View over every row
    pub fn view(&self) -> TableView<'_> {
        TableView {
            rows: self.records.iter().collect(),
        }
    }
}

impl FromIterator<SalesRecord> for SalesTable {
    fn from_iter<I: IntoIterator<Item = SalesRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Read-only selection of rows borrowed from a `SalesTable`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView<'a> {
    rows: Vec<&'a SalesRecord>,
}

impl<'a> TableView<'a> {
    pub fn from_rows(rows: Vec<&'a SalesRecord>) -> Self {
        Self { rows }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
