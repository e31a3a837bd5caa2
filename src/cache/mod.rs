//! Per-provider metadata cache.
//!
//! [`MetadataCache`] owns everything the provider learns about the backend:
//!
//! - metric names, their metadata and the histogram subset, replaced
//!   wholesale by [`MetadataCache::set_metrics`] / [`MetadataCache::set_metadata`];
//! - the label-name index loaded by the deferred preload task;
//! - the default labels, memoized once in a [`tokio::sync::OnceCell`] so that
//!   racing completion calls share a single fetch;
//! - `label_values_by_name`, one whole-value entry per label;
//! - [`series::SeriesLabelCache`], a small LRU of selector lookups.
//!
//! The cache is created empty with the provider and dropped with it.

pub mod series;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::OnceCell;

pub use series::{DEFAULT_SERIES_CACHE_CAPACITY, SeriesCacheKey, SeriesLabelCache};

use crate::Result;
use crate::types::{MetricMetadata, MetricsMetadata, SeriesLabels};

pub struct MetadataCache {
    metrics: RwLock<Arc<Vec<String>>>,
    metadata: RwLock<Arc<MetricsMetadata>>,
    histogram_metrics: RwLock<Arc<Vec<String>>>,
    label_keys: RwLock<Arc<Vec<String>>>,
    label_values_by_name: RwLock<HashMap<String, Arc<Vec<String>>>>,
    default_labels: OnceCell<Result<SeriesLabels>>,
    series: SeriesLabelCache,
}

impl MetadataCache {
    pub fn new(series_capacity: u64) -> Self {
        Self {
            metrics: RwLock::default(),
            metadata: RwLock::default(),
            histogram_metrics: RwLock::default(),
            label_keys: RwLock::default(),
            label_values_by_name: RwLock::default(),
            default_labels: OnceCell::new(),
            series: SeriesLabelCache::new(series_capacity),
        }
    }

    pub fn metrics(&self) -> Arc<Vec<String>> {
        read(&self.metrics)
    }

    /// Replace the metric list; the histogram subset follows it.
    pub fn set_metrics(&self, metrics: Vec<String>) {
        let histograms: Vec<String> = metrics
            .iter()
            .filter(|name| name.ends_with("_bucket"))
            .cloned()
            .collect();
        write(&self.metrics, Arc::new(metrics));
        write(&self.histogram_metrics, Arc::new(histograms));
    }

    pub fn histogram_metrics(&self) -> Arc<Vec<String>> {
        read(&self.histogram_metrics)
    }

    pub fn metadata(&self) -> Arc<MetricsMetadata> {
        read(&self.metadata)
    }

    pub fn set_metadata(&self, metadata: MetricsMetadata) {
        write(&self.metadata, Arc::new(expand_derived_metadata(metadata)));
    }

    pub fn label_keys(&self) -> Arc<Vec<String>> {
        read(&self.label_keys)
    }

    pub fn set_label_keys(&self, keys: Vec<String>) {
        write(&self.label_keys, Arc::new(keys));
    }

    pub fn label_values(&self, name: &str) -> Option<Arc<Vec<String>>> {
        self.label_values_by_name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn set_label_values(&self, name: impl Into<String>, values: Vec<String>) {
        self.label_values_by_name
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), Arc::new(values));
    }

    /// Default labels, fetched by `init` on first use only.
    ///
    /// Concurrent callers wait on the same in-flight fetch; its outcome,
    /// error included, is returned to every later caller.
    pub async fn default_labels<F, Fut>(&self, init: F) -> Result<SeriesLabels>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SeriesLabels>>,
    {
        self.default_labels.get_or_init(init).await.clone()
    }

    /// Whether the default-label fetch has completed.
    pub fn has_default_labels(&self) -> bool {
        self.default_labels.initialized()
    }

    pub fn series(&self) -> &SeriesLabelCache {
        &self.series
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new(DEFAULT_SERIES_CACHE_CAPACITY)
    }
}

fn read<T>(lock: &RwLock<Arc<T>>) -> Arc<T> {
    Arc::clone(&lock.read().unwrap_or_else(PoisonError::into_inner))
}

fn write<T>(lock: &RwLock<Arc<T>>, value: Arc<T>) {
    *lock.write().unwrap_or_else(PoisonError::into_inner) = value;
}

/// Give `_count`, `_sum` and `_bucket` series documentation derived from
/// their summary or histogram base metric.
pub fn expand_derived_metadata(mut metadata: MetricsMetadata) -> MetricsMetadata {
    let mut derived = Vec::new();
    for (name, meta) in &metadata {
        let kind = match meta.metric_type.as_str() {
            "histogram" => "histogram",
            "summary" => "summary",
            _ => continue,
        };
        if kind == "histogram" {
            derived.push((
                format!("{name}_bucket"),
                format!("Cumulative counters for the observation buckets ({})", meta.help),
            ));
        }
        derived.push((
            format!("{name}_count"),
            format!(
                "Count of events that have been observed for the {kind} metric ({})",
                meta.help
            ),
        ));
        derived.push((
            format!("{name}_sum"),
            format!(
                "Total sum of all observed values for the {kind} metric ({})",
                meta.help
            ),
        ));
    }

    for (name, help) in derived {
        metadata.entry(name).or_insert(MetricMetadata {
            metric_type: "counter".to_string(),
            help,
            unit: String::new(),
        });
    }
    metadata
}
