//! Series objects and the label view derived from them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One series returned by `/api/v1/series`, keyed by label name.
pub type Series = BTreeMap<String, String>;

/// Label names observed across a set of series, with their distinct values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesLabels {
    labels: BTreeMap<String, Vec<String>>,
}

impl SeriesLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect labels from series. `__name__` is kept only when `with_name`.
    pub fn from_series(series: &[Series], with_name: bool) -> Self {
        let mut sets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for s in series {
            for (key, value) in s {
                if !with_name && key == "__name__" {
                    continue;
                }
                sets.entry(key.clone()).or_default().insert(value.clone());
            }
        }
        Self {
            labels: sets
                .into_iter()
                .map(|(k, v)| (k, v.into_iter().collect()))
                .collect(),
        }
    }

    /// Label names only, with no known values.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: names.into_iter().map(|n| (n.into(), Vec::new())).collect(),
        }
    }

    /// Set the values of one label, replacing what was there.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.labels.insert(name.into(), values);
    }

    /// Label names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.labels.keys().cloned().collect()
    }

    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.labels.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
