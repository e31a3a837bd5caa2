//! The PromQL language provider.
//!
//! [`LanguageProvider`] binds a [`Datasource`] to a [`MetadataCache`] and
//! exposes the metadata fetch API, the preload entry point and completion
//! (see [`completion`]). Cloning is cheap and clones share one cache.

mod builder;
pub mod completion;
pub mod config;

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, try_join, try_join_all};
use serde::de::DeserializeOwned;
use tracing::debug;

pub use builder::LanguageProviderBuilder;
pub use config::{DefaultLabelStrategy, ProviderConfig};

use crate::Result;
use crate::cache::{MetadataCache, SeriesCacheKey};
use crate::cancel::{CancelHandle, Cancelable, PreloadTask, cancelable};
use crate::convert;
use crate::telemetry;
use crate::traits::{Datasource, RequestParams};
use crate::types::{
    AbstractQuery, MetricMetadata, MetricsMetadata, PromQuery, Series, SeriesLabels, TimeRange,
};

const LABELS_ENDPOINT: &str = "/api/v1/labels";
const SERIES_ENDPOINT: &str = "/api/v1/series";
const METADATA_ENDPOINT: &str = "/api/v1/metadata";

fn label_values_endpoint(label: &str) -> String {
    format!("/api/v1/label/{label}/values")
}

/// Context-aware completion and metadata access for one datasource.
#[derive(Clone)]
pub struct LanguageProvider {
    datasource: Arc<dyn Datasource>,
    cache: Arc<MetadataCache>,
    config: Arc<ProviderConfig>,
}

impl LanguageProvider {
    /// Create a new builder bound to `datasource`.
    pub fn builder(datasource: Arc<dyn Datasource>) -> LanguageProviderBuilder {
        LanguageProviderBuilder::new(datasource)
    }

    /// Provider with the default configuration.
    pub fn new(datasource: Arc<dyn Datasource>) -> Self {
        Self::builder(datasource).build()
    }

    pub(crate) fn from_parts(datasource: Arc<dyn Datasource>, config: ProviderConfig) -> Self {
        Self {
            datasource,
            cache: Arc::new(MetadataCache::new(config.series_cache_capacity)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn datasource(&self) -> &Arc<dyn Datasource> {
        &self.datasource
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Known metric names, as of the last preload.
    pub fn metrics(&self) -> Arc<Vec<String>> {
        self.cache.metrics()
    }

    pub fn metrics_metadata(&self) -> Arc<MetricsMetadata> {
        self.cache.metadata()
    }

    pub fn histogram_metrics(&self) -> Arc<Vec<String>> {
        self.cache.histogram_metrics()
    }

    pub fn label_keys(&self) -> Arc<Vec<String>> {
        self.cache.label_keys()
    }

    // =========================================================================
    // Preload
    // =========================================================================

    /// Load metric names and metadata.
    ///
    /// Returns the deferred preload tasks (the label-name index load), each
    /// cancelable through [`Cancelable::handle`]. Issues no request at all
    /// when lookups are disabled. Transport failures are returned as is.
    pub async fn start(&self, range: Option<TimeRange>) -> Result<Vec<PreloadTask>> {
        if self.datasource.lookups_disabled() {
            debug!("metadata lookups disabled, skipping preload");
            return Ok(Vec::new());
        }

        let (metrics, metadata) = try_join(
            self.fetch_metric_names(range.as_ref()),
            self.fetch_raw_metadata(range.as_ref()),
        )
        .await?;
        debug!(
            metrics = metrics.len(),
            metadata = metadata.len(),
            "preloaded metric names"
        );
        self.cache.set_metrics(metrics);
        self.cache.set_metadata(metadata);

        let provider = self.clone();
        let (label_index, _) = cancelable(
            async move { provider.fetch_labels_in(range.as_ref()).await.map(|_| ()) }.boxed(),
        );
        Ok(vec![label_index])
    }

    /// [`start`](Self::start) wrapped so it can be canceled.
    ///
    /// A canceled preload resolves to [`AssistError::Canceled`](crate::AssistError::Canceled)
    /// and its remaining work is dropped.
    pub fn start_cancelable(
        &self,
        range: Option<TimeRange>,
    ) -> (
        Cancelable<BoxFuture<'static, Result<Vec<PreloadTask>>>>,
        CancelHandle,
    ) {
        let provider = self.clone();
        cancelable(async move { provider.start(range).await }.boxed())
    }

    // =========================================================================
    // Fetch API
    // =========================================================================

    /// Series matching `selector`. Always hits the backend.
    pub async fn fetch_series(&self, selector: &str) -> Result<Vec<Series>> {
        let mut params = self.params("series", None);
        params.push(("match[]".to_string(), selector.to_string()));
        let data = self.request("series", SERIES_ENDPOINT, params).await?;
        decode(data)
    }

    /// Label names and their observed values across the series matching
    /// `selector`, after variable interpolation.
    ///
    /// `__name__` is kept only when `with_name` is set. With labels-match
    /// support only names are fetched and the value lists are empty.
    pub async fn fetch_series_labels(&self, selector: &str, with_name: bool) -> Result<SeriesLabels> {
        let selector = self.datasource.interpolate_string(selector);
        let match_api = self.datasource.has_labels_match_api_support();
        let endpoint = if match_api { "labels" } else { "series" };

        let key = SeriesCacheKey::new(
            endpoint,
            selector.as_str(),
            with_name,
            &self.datasource.time_range_params(),
        );
        if let Some(labels) = self.cache.series().get(&key).await {
            debug!(selector = %selector, "series labels cache hit");
            return Ok(labels);
        }

        let mut params = self.params(endpoint, None);
        params.push(("match[]".to_string(), selector.clone()));

        let labels = if match_api {
            let data = self.request(endpoint, LABELS_ENDPOINT, params).await?;
            let names: Vec<String> = decode(data)?;
            SeriesLabels::from_names(
                names
                    .into_iter()
                    .filter(|name| with_name || name != "__name__"),
            )
        } else {
            let data = self.request(endpoint, SERIES_ENDPOINT, params).await?;
            let series: Vec<Series> = decode(data)?;
            SeriesLabels::from_series(&series, with_name)
        };

        self.cache.series().insert(key, labels.clone()).await;
        Ok(labels)
    }

    /// All values of `label`, after variable interpolation.
    ///
    /// The result also replaces the cached values for that label.
    pub async fn fetch_label_values(&self, label: &str) -> Result<Vec<String>> {
        let label = self.datasource.interpolate_string(label);
        let params = self.params("label_values", None);
        let data = self
            .request("label_values", &label_values_endpoint(&label), params)
            .await?;
        let values: Vec<String> = decode(data)?;
        self.cache.set_label_values(label, values.clone());
        Ok(values)
    }

    /// Values of `label` among the series matching `selector`.
    pub async fn fetch_label_values_matching(
        &self,
        label: &str,
        selector: &str,
    ) -> Result<Vec<String>> {
        let label = self.datasource.interpolate_string(label);

        if self.datasource.has_labels_match_api_support() {
            let mut params = self.params("label_values", None);
            params.push((
                "match[]".to_string(),
                self.datasource.interpolate_string(selector),
            ));
            let data = self
                .request("label_values", &label_values_endpoint(&label), params)
                .await?;
            return decode(data);
        }

        let labels = self.fetch_series_labels(selector, true).await?;
        Ok(labels.values(&label).map(<[String]>::to_vec).unwrap_or_default())
    }

    /// Load the label-name index and keep it in the cache.
    pub async fn fetch_labels(&self) -> Result<Vec<String>> {
        self.fetch_labels_in(None).await
    }

    /// Load metric metadata. Summary and histogram entries gain derived
    /// `_count`/`_sum`/`_bucket` documentation.
    pub async fn fetch_metrics_metadata(&self) -> Result<MetricsMetadata> {
        let metadata = self.fetch_raw_metadata(None).await?;
        self.cache.set_metadata(metadata);
        Ok(self.cache.metadata().as_ref().clone())
    }

    /// Default label names (and, for canonical keys, their values).
    ///
    /// Fetched at most once per provider; concurrent callers share the
    /// in-flight request and later callers get the stored outcome.
    pub async fn default_labels(&self) -> Result<SeriesLabels> {
        self.cache
            .default_labels(|| self.load_default_labels())
            .await
    }

    // =========================================================================
    // Abstract query bridge
    // =========================================================================

    pub fn import_from_abstract_query(&self, query: &AbstractQuery) -> PromQuery {
        convert::import_from_abstract_query(query)
    }

    pub fn export_to_abstract_query(&self, query: &PromQuery) -> AbstractQuery {
        convert::export_to_abstract_query(query)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn load_default_labels(&self) -> Result<SeriesLabels> {
        match &self.config.default_labels {
            DefaultLabelStrategy::CanonicalValues { keys } => {
                let values = try_join_all(keys.iter().map(|key| self.fetch_label_values(key))).await?;
                let mut labels = SeriesLabels::new();
                for (key, values) in keys.iter().zip(values) {
                    labels.insert(key.clone(), values);
                }
                Ok(labels)
            }
            DefaultLabelStrategy::LabelIndex => {
                let names = self.fetch_labels().await?;
                Ok(SeriesLabels::from_names(names))
            }
        }
    }

    async fn fetch_metric_names(&self, range: Option<&TimeRange>) -> Result<Vec<String>> {
        let params = self.params("label_values", range);
        let data = self
            .request("label_values", &label_values_endpoint("__name__"), params)
            .await?;
        decode(data)
    }

    async fn fetch_raw_metadata(&self, range: Option<&TimeRange>) -> Result<MetricsMetadata> {
        let params = self.params("metadata", range);
        let data = self.request("metadata", METADATA_ENDPOINT, params).await?;
        let raw: HashMap<String, Vec<MetricMetadata>> = decode(data)?;
        Ok(raw
            .into_iter()
            .filter_map(|(name, mut entries)| {
                (!entries.is_empty()).then(|| (name, entries.swap_remove(0)))
            })
            .collect())
    }

    async fn fetch_labels_in(&self, range: Option<&TimeRange>) -> Result<Vec<String>> {
        let params = self.params("labels", range);
        let data = self.request("labels", LABELS_ENDPOINT, params).await?;
        let names: Vec<String> = decode(data)?;
        self.cache.set_label_keys(names.clone());
        Ok(names)
    }

    /// `start`, `end` and `limit` for `limit_key`.
    fn params(&self, limit_key: &str, range: Option<&TimeRange>) -> RequestParams {
        let range = match range {
            Some(range) => range.to_params(),
            None => self.datasource.time_range_params(),
        };
        vec![
            ("start".to_string(), range.start),
            ("end".to_string(), range.end),
            (
                "limit".to_string(),
                self.datasource.limit_metrics(limit_key).to_string(),
            ),
        ]
    }

    /// The single seam every metadata request goes through.
    async fn request(
        &self,
        endpoint: &'static str,
        url: &str,
        params: RequestParams,
    ) -> Result<serde_json::Value> {
        let result = self.datasource.get_request(url, &params).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::METADATA_REQUESTS_TOTAL,
            "endpoint" => endpoint,
            "status" => status,
        )
        .increment(1);
        debug!(url, endpoint, status, "metadata request");
        result
    }
}

fn decode<T: DeserializeOwned>(data: serde_json::Value) -> Result<T> {
    Ok(serde_json::from_value(data)?)
}

impl std::fmt::Debug for LanguageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageProvider")
            .field("config", &self.config)
            .field("metrics", &self.cache.metrics().len())
            .finish_non_exhaustive()
    }
}
