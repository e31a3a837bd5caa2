//! Builder for configuring provider instances

use std::sync::Arc;

use super::{DefaultLabelStrategy, LanguageProvider, ProviderConfig};
use crate::traits::Datasource;

/// Builder for [`LanguageProvider`].
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use promql_assist::{ClientConfig, LanguageProvider, PrometheusClient};
/// # fn main() -> promql_assist::Result<()> {
/// let client = PrometheusClient::new(ClientConfig::new("http://localhost:9090"))?;
/// let provider = LanguageProvider::builder(Arc::new(client))
///     .history_limit(10)
///     .build();
/// # Ok(())
/// # }
/// ```
pub struct LanguageProviderBuilder {
    datasource: Arc<dyn Datasource>,
    config: ProviderConfig,
}

impl LanguageProviderBuilder {
    pub fn new(datasource: Arc<dyn Datasource>) -> Self {
        Self {
            datasource,
            config: ProviderConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    /// Choose how unscoped label names are loaded.
    pub fn default_labels(mut self, strategy: DefaultLabelStrategy) -> Self {
        self.config.default_labels = strategy;
        self
    }

    pub fn suggestions_limit(mut self, limit: usize) -> Self {
        self.config.suggestions_limit = limit;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    pub fn series_cache_capacity(mut self, capacity: u64) -> Self {
        self.config.series_cache_capacity = capacity;
        self
    }

    /// Build the provider. Its cache starts empty.
    pub fn build(self) -> LanguageProvider {
        LanguageProvider::from_parts(self.datasource, self.config)
    }
}
