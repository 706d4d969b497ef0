//! Filter Engine
//!
//! Narrows a table to the rows a request asked for. All predicates are conjunctive;
//! absent bounds and empty inclusion sets place no restriction.

use crate::error::{Result, SalesError};
use crate::model::{SalesRecord, SalesTable, TableView};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Request-scoped row selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Inclusive lower bound on order date
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on order date
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub regions: BTreeSet<String>,
    #[serde(default)]
    pub segments: BTreeSet<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions.extend(regions.into_iter().map(Into::into));
        self
    }

    pub fn with_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments.extend(segments.into_iter().map(Into::into));
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.extend(categories.into_iter().map(Into::into));
        self
    }

    /// Build a spec from decoded query parameters.
    ///
    /// Keys: `start_date`, `end_date` (YYYY-MM-DD), and `regions`, `segments`,
    /// `categories`, each repeatable and/or comma-separated. Unknown keys are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut spec = FilterSpec::default();

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "start_date" if !value.is_empty() => {
                    spec.start_date = Some(parse_query_date("start_date", value)?);
                }
                "end_date" if !value.is_empty() => {
                    spec.end_date = Some(parse_query_date("end_date", value)?);
                }
                "regions" => spec.regions.extend(split_list(value)),
                "segments" => spec.segments.extend(split_list(value)),
                "categories" => spec.categories.extend(split_list(value)),
                _ => {}
            }
        }

        Ok(spec)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.regions.is_empty()
            && self.segments.is_empty()
            && self.categories.is_empty()
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(start) = self.start_date {
            if record.order_date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if record.order_date > end {
                return false;
            }
        }
        included(&self.regions, &record.region)
            && included(&self.segments, &record.segment)
            && included(&self.categories, &record.category)
    }
}

/// Rows of `table` matching `spec`, in table order
pub fn apply<'a>(table: &'a SalesTable, spec: &FilterSpec) -> TableView<'a> {
    if spec.is_unrestricted() {
        return table.view();
    }
    TableView::from_rows(
        table
            .records()
            .iter()
            .filter(|record| spec.matches(record))
            .collect(),
    )
}

fn included(set: &BTreeSet<String>, value: &str) -> bool {
    set.is_empty() || set.contains(value)
}

fn parse_query_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        SalesError::InvalidRequest(format!(
            "{} must be a date in YYYY-MM-DD format, got {:?}",
            field, value
        ))
    })
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
