//! Predicate Filter - the ordered subsequence of records matching all
//! active predicates.
//!
//! Three predicate families are combined with AND:
//!
//! - text: case-insensitive substring match against any of the record's
//!   [`Record::search_fields`]; an empty query matches everything
//! - status: exact equality against [`Record::category`], or the `All`
//!   sentinel which always matches
//! - date range: inclusive bounds against the parsed [`Record::timestamp`];
//!   malformed timestamps never match a bounded range
//!
//! Filtering is pure and stable: output order is input order.

mod date;

use serde::{Deserialize, Serialize};

use crate::Record;

pub use date::{parse_timestamp, DateRange};

/// Sentinel status value that matches every record.
pub const ALL_STATUSES: &str = "All";

/// Categorical constraint on [`Record::category`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    pub fn matches(&self, category: Option<&str>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => category == Some(wanted.as_str()),
        }
    }
}

impl From<&str> for StatusFilter {
    fn from(value: &str) -> Self {
        if value.is_empty() || value == ALL_STATUSES {
            StatusFilter::All
        } else {
            StatusFilter::Only(value.to_string())
        }
    }
}

impl From<String> for StatusFilter {
    fn from(value: String) -> Self {
        StatusFilter::from(value.as_str())
    }
}

impl From<StatusFilter> for String {
    fn from(value: StatusFilter) -> Self {
        match value {
            StatusFilter::All => ALL_STATUSES.to_string(),
            StatusFilter::Only(status) => status,
        }
    }
}

/// The user's current filter inputs. Recomputed on every input event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: String,
    pub status: StatusFilter,
    pub date_range: DateRange,
}

impl FilterCriteria {
    /// Criteria that match everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// True when no predicate constrains anything.
    pub fn is_pass_through(&self) -> bool {
        self.query.trim().is_empty()
            && self.status == StatusFilter::All
            && self.date_range.is_unbounded()
    }

    /// Check a single record against all predicates.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        Matcher::new(self).matches(record)
    }
}

/// Criteria with the query normalized once per filter pass.
struct Matcher<'c> {
    needle: String,
    criteria: &'c FilterCriteria,
}

impl<'c> Matcher<'c> {
    fn new(criteria: &'c FilterCriteria) -> Self {
        Self {
            needle: criteria.query.trim().to_lowercase(),
            criteria,
        }
    }

    fn matches<R: Record>(&self, record: &R) -> bool {
        self.matches_text(record)
            && self.criteria.status.matches(record.category())
            && self.criteria.date_range.matches_raw(record.timestamp())
    }

    fn matches_text<R: Record>(&self, record: &R) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// Produce the records matching `criteria`, preserving source order.
pub fn apply<'a, R: Record>(records: &'a [R], criteria: &FilterCriteria) -> Vec<&'a R> {
    let matcher = Matcher::new(criteria);
    records.iter().filter(|r| matcher.matches(*r)).collect()
}

/// Owned variant of [`apply`], for handing a filtered view to code that
/// outlives the source slice.
pub fn apply_cloned<R: Record>(records: &[R], criteria: &FilterCriteria) -> Vec<R> {
    apply(records, criteria).into_iter().cloned().collect()
}
