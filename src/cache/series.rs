//! Bounded LRU for series-label lookups.
//!
//! Keyed on the endpoint, the interpolated selector, whether `__name__` is
//! kept and the query window rounded down to the minute. Rounding lets rapid
//! keystrokes reuse a result while a dashboard time-range change still
//! misses. Entries are replaced wholesale on insert.

use moka::future::Cache;

use crate::telemetry;
use crate::types::{SeriesLabels, TimeRangeParams};

/// Default number of selectors kept.
pub const DEFAULT_SERIES_CACHE_CAPACITY: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesCacheKey {
    endpoint: &'static str,
    selector: String,
    with_name: bool,
    start: String,
    end: String,
}

impl SeriesCacheKey {
    pub fn new(
        endpoint: &'static str,
        selector: impl Into<String>,
        with_name: bool,
        range: &TimeRangeParams,
    ) -> Self {
        let (start, end) = range.rounded_to_minute();
        Self {
            endpoint,
            selector: selector.into(),
            with_name,
            start,
            end,
        }
    }
}

pub struct SeriesLabelCache {
    entries: Cache<SeriesCacheKey, SeriesLabels>,
}

impl SeriesLabelCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: Cache::new(capacity),
        }
    }

    pub async fn get(&self, key: &SeriesCacheKey) -> Option<SeriesLabels> {
        match self.entries.get(key).await {
            Some(labels) => {
                metrics::counter!(telemetry::SERIES_CACHE_HITS_TOTAL).increment(1);
                Some(labels)
            }
            None => {
                metrics::counter!(telemetry::SERIES_CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    pub async fn insert(&self, key: SeriesCacheKey, labels: SeriesLabels) {
        self.entries.insert(key, labels).await;
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for SeriesLabelCache {
    fn default() -> Self {
        Self::new(DEFAULT_SERIES_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> TimeRangeParams {
        TimeRangeParams {
            start: start.into(),
            end: end.into(),
        }
    }

    #[test]
    fn keys_within_the_same_minute_match() {
        let a = SeriesCacheKey::new("series", "{}", true, &range("1600000000", "1600003605"));
        let b = SeriesCacheKey::new("series", "{}", true, &range("1600000010", "1600003610"));
        assert_eq!(a, b);
    }

    #[test]
    fn with_name_is_part_of_the_key() {
        let r = range("0", "60");
        assert_ne!(
            SeriesCacheKey::new("series", "{}", true, &r),
            SeriesCacheKey::new("series", "{}", false, &r)
        );
    }

    #[tokio::test]
    async fn stores_and_returns_labels() {
        let cache = SeriesLabelCache::default();
        let key = SeriesCacheKey::new("series", "{job=\"a\"}", true, &range("0", "60"));
        assert!(cache.get(&key).await.is_none());

        cache
            .insert(key.clone(), SeriesLabels::from_names(["job"]))
            .await;
        assert!(cache.get(&key).await.unwrap().contains("job"));
    }
}
