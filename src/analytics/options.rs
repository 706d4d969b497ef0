use crate::model::{SalesRecord, SalesTable};
use chrono::NaiveDate;
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// `YYYY-MM-DD`, absent for an empty table
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Values a caller can filter on, taken from the unfiltered table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub segments: Vec<String>,
    pub categories: Vec<String>,
    pub date_range: DateRange,
}

pub fn filter_options(table: &SalesTable) -> FilterOptions {
    let records = table.records();

    let (min, max) = match records.iter().map(|r| r.order_date).minmax() {
        MinMaxResult::NoElements => (None, None),
        MinMaxResult::OneElement(d) => (Some(d), Some(d)),
        MinMaxResult::MinMax(lo, hi) => (Some(lo), Some(hi)),
    };
    let fmt = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());

    FilterOptions {
        regions: distinct(records, |r| &r.region),
        segments: distinct(records, |r| &r.segment),
        categories: distinct(records, |r| &r.category),
        date_range: DateRange {
            min: fmt(min),
            max: fmt(max),
        },
    }
}

/// Sorted distinct non-blank values of one text field
fn distinct<'a, F>(records: &'a [SalesRecord], field: F) -> Vec<String>
where
    F: Fn(&'a SalesRecord) -> &'a String,
{
    records
        .iter()
        .map(field)
        .filter(|v| !v.is_empty())
        .unique()
        .sorted()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_table;

    #[test]
    fn test_sample_options() {
        let options = filter_options(&sample_table());

        assert_eq!(options.regions, vec!["Central", "East", "West"]);
        assert_eq!(options.segments, vec!["Consumer", "Corporate", "Home Office"]);
        assert_eq!(options.categories, vec!["Furniture", "Office Supplies", "Technology"]);
        assert_eq!(options.date_range.min.as_deref(), Some("2023-01-15"));
        assert_eq!(options.date_range.max.as_deref(), Some("2023-03-10"));
    }

    #[test]
    fn test_empty_table_options() {
        let options = filter_options(&SalesTable::default());
        assert!(options.regions.is_empty());
        assert_eq!(options.date_range, DateRange { min: None, max: None });
    }
}
