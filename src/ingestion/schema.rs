//! Snapshot Schema
//!
//! Validates that the decoded frame carries every required column, then coerces and
//! cleans it into typed `SalesRecord`s:
//! - text and date columns are cast to strings (dictionary, date and datetime
//!   encodings are all accepted) and dates are parsed; failures become missing
//! - numeric columns are cast to floats; failures and non-finite values become missing
//! - missing sales, profit, quantity and discount are filled with zero
//! - rows whose order date is missing are dropped

use crate::error::{Result, SalesError};
use crate::model::{SalesRecord, SalesTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::{debug, warn};

pub const ORDER_DATE: &str = "Order Date";
pub const SHIP_DATE: &str = "Ship Date";
pub const SALES: &str = "Sales";
pub const PROFIT: &str = "Profit";
pub const QUANTITY: &str = "Quantity";
pub const DISCOUNT: &str = "Discount";
pub const ORDER_ID: &str = "Order ID";
pub const CUSTOMER_ID: &str = "Customer ID";
pub const CUSTOMER_NAME: &str = "Customer Name";
pub const SEGMENT: &str = "Segment";
pub const REGION: &str = "Region";
pub const CATEGORY: &str = "Category";
pub const SUB_CATEGORY: &str = "Sub-Category";
pub const PRODUCT_NAME: &str = "Product Name";
/// Optional; only the geographic view needs it
pub const STATE: &str = "State";

pub const REQUIRED_COLUMNS: [&str; 14] = [
    ORDER_DATE,
    SHIP_DATE,
    SALES,
    PROFIT,
    QUANTITY,
    DISCOUNT,
    ORDER_ID,
    CUSTOMER_ID,
    CUSTOMER_NAME,
    SEGMENT,
    REGION,
    CATEGORY,
    SUB_CATEGORY,
    PRODUCT_NAME,
];

/// Counts collected while cleaning a frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub dropped_rows: usize,
    pub filled_numeric_values: usize,
}

/// Fail with the names of every required column the frame lacks
pub fn validate_columns(df: &DataFrame) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| df.column(name).is_err())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SalesError::DataValidation { missing })
    }
}

/// Coerce and clean a validated frame into a table
pub fn build_table(df: &DataFrame) -> Result<(SalesTable, CleaningReport)> {
    validate_columns(df)?;

    let order_dates = date_column(df, ORDER_DATE)?;
    let ship_dates = date_column(df, SHIP_DATE)?;
    let order_ids = text_column(df, ORDER_ID)?;
    let customer_ids = text_column(df, CUSTOMER_ID)?;
    let customer_names = text_column(df, CUSTOMER_NAME)?;
    let segments = text_column(df, SEGMENT)?;
    let regions = text_column(df, REGION)?;
    let categories = text_column(df, CATEGORY)?;
    let sub_categories = text_column(df, SUB_CATEGORY)?;
    let product_names = text_column(df, PRODUCT_NAME)?;
    let states = if df.column(STATE).is_ok() {
        text_column(df, STATE)?
    } else {
        debug!("Snapshot has no {:?} column; geographic view will be empty", STATE);
        vec![String::new(); df.height()]
    };

    let sales = numeric_column(df, SALES)?;
    let profit = numeric_column(df, PROFIT)?;
    let quantity = numeric_column(df, QUANTITY)?;
    let discount = numeric_column(df, DISCOUNT)?;

    let mut report = CleaningReport {
        input_rows: df.height(),
        ..Default::default()
    };
    let mut fill = |value: Option<f64>| -> f64 {
        value.unwrap_or_else(|| {
            report.filled_numeric_values += 1;
            0.0
        })
    };

    let mut records = Vec::with_capacity(df.height());
    let mut dropped = 0;

    for idx in 0..df.height() {
        let sales = fill(sales[idx]);
        let profit = fill(profit[idx]);
        let quantity = fill(quantity[idx]);
        let discount = fill(discount[idx]);

        let Some(order_date) = order_dates[idx] else {
            dropped += 1;
            continue;
        };

        records.push(SalesRecord {
            order_id: order_ids[idx].clone(),
            order_date,
            ship_date: ship_dates[idx],
            customer_id: customer_ids[idx].clone(),
            customer_name: customer_names[idx].clone(),
            segment: segments[idx].clone(),
            region: regions[idx].clone(),
            state: states[idx].clone(),
            category: categories[idx].clone(),
            sub_category: sub_categories[idx].clone(),
            product_name: product_names[idx].clone(),
            sales,
            profit,
            quantity: quantity.round() as i64,
            discount,
        });
    }

    report.dropped_rows = dropped;
    if dropped > 0 {
        warn!(
            "Dropped {} of {} rows with unparseable {:?}",
            dropped, report.input_rows, ORDER_DATE
        );
    }
    if report.filled_numeric_values > 0 {
        debug!(
            "Filled {} missing numeric values with 0",
            report.filled_numeric_values
        );
    }

    Ok((SalesTable::new(records), report))
}

/// Parse the date forms seen in exported snapshots
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Some(d);
    }

    // Datetime renderings with a zone suffix
    s.get(..10)
        .filter(|_| s.len() > 10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    Ok(string_values(df, name)?
        .into_iter()
        .map(|v| v.unwrap_or_default())
        .collect())
}

fn date_column(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    Ok(string_values(df, name)?
        .into_iter()
        .map(|v| v.as_deref().and_then(parse_date))
        .collect())
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Ok(values)
}
