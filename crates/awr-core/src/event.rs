//! Classified activity events returned by the query service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator placed between segments when a category path is rendered as a key.
pub const PATH_DELIMITER: &str = "->";

/// Ordered category labels, from the most general to the most specific.
///
/// An empty path marks an uncategorized event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryPath(Vec<String>);

impl CategoryPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the path as a report key, e.g. `Work->Programming`.
    pub fn key(&self) -> String {
        self.0.join(PATH_DELIMITER)
    }

    /// Keys of every non-empty prefix, longest first.
    ///
    /// `["Work", "Programming"]` yields `Work->Programming`, then `Work`.
    pub fn prefix_keys(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.0.len())
            .rev()
            .map(|depth| self.0[..depth].join(PATH_DELIMITER))
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl<S: Into<String>> FromIterator<S> for CategoryPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// One observed activity interval tagged with its deepest matching category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    /// Opaque identifier assigned by the query service, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Interval start as an ISO 8601 string.
    pub timestamp: String,
    /// Length of the interval in seconds. Never negative.
    pub duration_seconds: f64,
    /// Category path assigned by the query service.
    pub category: CategoryPath,
}

impl ClassifiedEvent {
    pub fn new(timestamp: impl Into<String>, duration_seconds: f64, category: CategoryPath) -> Self {
        Self {
            id: None,
            timestamp: timestamp.into(),
            duration_seconds,
            category,
        }
    }

    /// Duration in hours.
    pub fn hours(&self) -> f64 {
        self.duration_seconds / 3600.0
    }
}
