//! Prometheus HTTP API datasource.
//!
//! Speaks the `/api/v1` metadata endpoints and unwraps the
//! `{status, data, error}` response envelope.
//! See: <https://prometheus.io/docs/prometheus/latest/querying/api/>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::config::{ClientConfig, interpolate};
use crate::traits::{Datasource, RequestParams};
use crate::types::{TimeRange, TimeRangeParams};
use crate::{AssistError, Result};

/// [`Datasource`] backed by a Prometheus-compatible HTTP API.
#[derive(Clone)]
pub struct PrometheusClient {
    http: Client,
    config: ClientConfig,
}

impl PrometheusClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("promql-assist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AssistError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn handle_response_errors(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Prometheus reports 4xx/5xx details in the envelope's `error`.
        let message = match response.json::<Envelope>().await {
            Ok(Envelope {
                error: Some(error), ..
            }) => error,
            _ => format!("Prometheus API error: {status}"),
        };
        Err(AssistError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Datasource for PrometheusClient {
    async fn get_request(&self, url: &str, params: &RequestParams) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), url);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| AssistError::Http(e.to_string()))?;
        let response = Self::handle_response_errors(response).await?;

        let envelope: Envelope = response.json().await?;
        match envelope.status.as_str() {
            "success" => Ok(envelope.data.unwrap_or(serde_json::Value::Null)),
            _ => Err(AssistError::Backend(
                envelope
                    .error
                    .unwrap_or_else(|| format!("unexpected status {:?}", envelope.status)),
            )),
        }
    }

    fn time_range_params(&self) -> TimeRangeParams {
        TimeRange::last(Duration::from_secs(self.config.lookback_secs)).to_params()
    }

    fn interpolate_string(&self, value: &str) -> String {
        interpolate(value, &self.config.variables)
    }

    fn limit_metrics(&self, key: &str) -> u64 {
        self.config.limits.get(key).copied().unwrap_or(0)
    }

    fn lookups_disabled(&self) -> bool {
        self.config.lookups_disabled
    }

    fn has_labels_match_api_support(&self) -> bool {
        self.config.labels_match_api
    }
}

#[derive(Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}
