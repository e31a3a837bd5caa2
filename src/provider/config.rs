//! Provider configuration.

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_SERIES_CACHE_CAPACITY;

/// How the label names offered in an unscoped `{}` are obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefaultLabelStrategy {
    /// Fetch the values of a fixed set of well-known labels, concurrently.
    /// The label names offered are exactly these keys.
    CanonicalValues { keys: Vec<String> },
    /// One request to the label-name index.
    LabelIndex,
}

impl Default for DefaultLabelStrategy {
    fn default() -> Self {
        DefaultLabelStrategy::CanonicalValues {
            keys: vec!["job".to_string(), "instance".to_string()],
        }
    }
}

/// Configuration for a [`LanguageProvider`](crate::LanguageProvider).
///
/// ```rust
/// # use promql_assist::{DefaultLabelStrategy, ProviderConfig};
/// let config = ProviderConfig::new()
///     .default_labels(DefaultLabelStrategy::LabelIndex)
///     .history_limit(10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Strategy for the memoized default-label fetch.
    pub default_labels: DefaultLabelStrategy,
    /// Label and label-value groups are cut at this many items. Default: 10,000.
    pub suggestions_limit: usize,
    /// Maximum history items offered. Default: 5.
    pub history_limit: usize,
    /// Selectors kept in the series-label LRU. Default: 10.
    pub series_cache_capacity: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default_labels: DefaultLabelStrategy::default(),
            suggestions_limit: 10_000,
            history_limit: 5,
            series_cache_capacity: DEFAULT_SERIES_CACHE_CAPACITY,
        }
    }
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_labels(mut self, strategy: DefaultLabelStrategy) -> Self {
        self.default_labels = strategy;
        self
    }

    pub fn suggestions_limit(mut self, limit: usize) -> Self {
        self.suggestions_limit = limit;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn series_cache_capacity(mut self, capacity: u64) -> Self {
        self.series_cache_capacity = capacity;
        self
    }
}
