//! Grouping/Aggregation Stage - partition a filtered sequence by key and
//! accumulate per-group statistics.
//!
//! Groups are created lazily on the first record carrying their key. A record
//! whose key extractor returns `None` is left out of the pass entirely rather
//! than collected into an "unknown" bucket, so it cannot skew the totals.
//! Final order is an explicit stable sort on a caller-chosen metric.
//!
//! ## Example
//!
//! ```ignore
//! use orderview::group::{keys, Grouping};
//!
//! let couriers = Grouping::by(keys::courier_name)
//!     .sum("delivery", |o: &Order| o.delivery_price)
//!     .run(&filtered);
//!
//! for group in &couriers {
//!     println!("{}: {} orders, {:.2}", group.key, group.count, group.sum("delivery"));
//! }
//! ```

pub mod keys;

use std::collections::HashMap;
use std::fmt;

/// What groups are ranked by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    Count,
    /// A named sum accumulator.
    Sum(String),
}

impl Metric {
    pub fn sum(name: impl Into<String>) -> Self {
        Metric::Sum(name.into())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

type KeyFn<R> = Box<dyn Fn(&R) -> Option<String> + Send + Sync>;
type FieldFn<R> = Box<dyn Fn(&R) -> f64 + Send + Sync>;

/// A declared grouping: key extractor, sum accumulators and sort order.
pub struct Grouping<R> {
    key: KeyFn<R>,
    sums: Vec<(String, FieldFn<R>)>,
    sort: Option<(Metric, Direction)>,
}

/// One group of a finished pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a, R> {
    pub key: String,
    pub count: usize,
    /// Sum accumulators in declaration order.
    pub sums: Vec<(String, f64)>,
    /// Member records in input order.
    pub members: Vec<&'a R>,
}

impl<R> Group<'_, R> {
    /// Value of a named sum, `0.0` if no such accumulator was declared.
    pub fn sum(&self, name: &str) -> f64 {
        self.sums
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    fn metric(&self, metric: &Metric) -> f64 {
        match metric {
            Metric::Count => self.count as f64,
            Metric::Sum(name) => self.sum(name),
        }
    }
}

/// Accumulators computed directly over every keyed record, without grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub count: usize,
    pub sums: Vec<(String, f64)>,
}

impl Totals {
    pub fn sum(&self, name: &str) -> f64 {
        self.sums
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl<R> Grouping<R> {
    /// Start a grouping keyed by `key`.
    pub fn by<K>(key: K) -> Self
    where
        K: Fn(&R) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            key: Box::new(key),
            sums: Vec::new(),
            sort: None,
        }
    }

    /// Add a named sum accumulator. Non-finite field values count as zero.
    pub fn sum<F>(mut self, name: impl Into<String>, field: F) -> Self
    where
        F: Fn(&R) -> f64 + Send + Sync + 'static,
    {
        self.sums.push((name.into(), Box::new(field)));
        self
    }

    /// Rank groups by `metric`.
    ///
    /// Without an explicit sort, groups are ranked by the first declared sum
    /// (or by count when there is none), descending.
    pub fn sort_by(mut self, metric: Metric, direction: Direction) -> Self {
        self.sort = Some((metric, direction));
        self
    }

    fn effective_sort(&self) -> (Metric, Direction) {
        if let Some(sort) = &self.sort {
            return sort.clone();
        }
        match self.sums.first() {
            Some((name, _)) => (Metric::Sum(name.clone()), Direction::Descending),
            None => (Metric::Count, Direction::Descending),
        }
    }

    /// Run one aggregation pass.
    ///
    /// Ties on the sort metric keep first-encountered order.
    pub fn run<'a, I>(&self, records: I) -> Vec<Group<'a, R>>
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Group<'a, R>> = Vec::new();

        for record in records {
            let Some(key) = (self.key)(record) else {
                continue;
            };

            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    groups.push(Group {
                        key: key.clone(),
                        count: 0,
                        sums: self.sums.iter().map(|(n, _)| (n.clone(), 0.0)).collect(),
                        members: Vec::new(),
                    });
                    index.insert(key, groups.len() - 1);
                    groups.len() - 1
                }
            };

            let group = &mut groups[slot];
            group.count += 1;
            for ((_, total), (_, field)) in group.sums.iter_mut().zip(&self.sums) {
                *total += finite(field(record));
            }
            group.members.push(record);
        }

        let (metric, direction) = self.effective_sort();
        groups.sort_by(|a, b| {
            let ordering = a.metric(&metric).total_cmp(&b.metric(&metric));
            match direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });
        groups
    }

    /// Compute the same accumulators directly over the keyed records.
    pub fn totals<'a, I>(&self, records: I) -> Totals
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        let mut totals = Totals {
            count: 0,
            sums: self.sums.iter().map(|(n, _)| (n.clone(), 0.0)).collect(),
        };
        for record in records {
            if (self.key)(record).is_none() {
                continue;
            }
            totals.count += 1;
            for ((_, total), (_, field)) in totals.sums.iter_mut().zip(&self.sums) {
                *total += finite(field(record));
            }
        }
        totals
    }
}

impl<R> fmt::Debug for Grouping<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sums: Vec<&str> = self.sums.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("Grouping")
            .field("sums", &sums)
            .field("sort", &self.sort)
            .finish()
    }
}
