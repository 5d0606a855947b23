//! Hierarchical duration rollup.
//!
//! Every event adds its duration to its own category and to each ancestor,
//! so `Work` accrues the time of `Work->Programming` and everything below it.
//!
//! # Algorithm Summary
//!
//! 1. Skip events with an empty category path or zero duration
//! 2. Walk the path from the full key down to the root segment
//! 3. Add `duration_seconds / 3600` to the accumulator for each key

use std::collections::BTreeMap;
use std::collections::btree_map;

use rayon::prelude::*;
use serde::Serialize;

use crate::event::ClassifiedEvent;

/// Cumulative hours per category-path prefix.
///
/// Keys are path prefixes joined with [`crate::PATH_DELIMITER`]. Iteration
/// is sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DurationReport {
    hours: BTreeMap<String, f64>,
}

impl DurationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hours accumulated under `key`, if any event contributed to it.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.hours.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.hours.iter().map(|(key, hours)| (key.as_str(), *hours))
    }

    /// Sum of root-level categories, i.e. total categorized time.
    pub fn total_hours(&self) -> f64 {
        self.hours
            .iter()
            .filter(|(key, _)| !key.contains(crate::PATH_DELIMITER))
            .map(|(_, hours)| hours)
            .sum()
    }

    /// Folds one event into the report.
    pub fn record(&mut self, event: &ClassifiedEvent) {
        if event.duration_seconds <= 0.0 {
            return;
        }
        let hours = event.hours();
        for key in event.category.prefix_keys() {
            *self.hours.entry(key).or_insert(0.0) += hours;
        }
    }

    /// Adds every entry of `other` into `self`.
    pub fn merge(&mut self, other: Self) {
        for (key, hours) in other.hours {
            *self.hours.entry(key).or_insert(0.0) += hours;
        }
    }
}

impl IntoIterator for DurationReport {
    type Item = (String, f64);
    type IntoIter = btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.hours.into_iter()
    }
}

impl<'a> Extend<&'a ClassifiedEvent> for DurationReport {
    fn extend<T: IntoIterator<Item = &'a ClassifiedEvent>>(&mut self, iter: T) {
        for event in iter {
            self.record(event);
        }
    }
}

/// Computes cumulative hours for every category prefix seen in `events`.
///
/// Uncategorized events contribute nothing. Total over any input; an empty
/// slice yields an empty report.
pub fn aggregate(events: &[ClassifiedEvent]) -> DurationReport {
    let mut report = DurationReport::new();
    report.extend(events);
    tracing::debug!(
        events = events.len(),
        categories = report.len(),
        "aggregated durations"
    );
    report
}

/// Same result as [`aggregate`], folding shards of `events` in parallel.
///
/// Floating-point sums may differ from the sequential result in the last
/// few bits because the summation order differs.
pub fn aggregate_parallel(events: &[ClassifiedEvent]) -> DurationReport {
    events
        .par_iter()
        .fold(DurationReport::new, |mut report, event| {
            report.record(event);
            report
        })
        .reduce(DurationReport::new, |mut left, right| {
            left.merge(right);
            left
        })
}
