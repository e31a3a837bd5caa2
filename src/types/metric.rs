//! Metric names and backend metadata.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A metric known to the backend.
///
/// Metrics discovered by name only (no metadata endpoint entry) carry
/// `None` for `metric_type` and `help`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Metric {
    /// A metric known by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metric_type: None,
            help: None,
        }
    }

    /// Attach type and help text.
    pub fn with_metadata(mut self, metadata: &MetricMetadata) -> Self {
        self.metric_type = Some(metadata.metric_type.clone());
        self.help = Some(metadata.help.clone());
        self
    }

    /// Documentation line shown next to the suggestion, e.g. `COUNTER: Total requests`.
    pub fn documentation(&self) -> Option<String> {
        match (&self.metric_type, &self.help) {
            (Some(ty), Some(help)) => Some(format!("{}: {help}", ty.to_uppercase())),
            (Some(ty), None) => Some(ty.to_uppercase()),
            (None, Some(help)) => Some(help.clone()),
            (None, None) => None,
        }
    }
}

/// One entry of the `/api/v1/metadata` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricMetadata {
    #[serde(rename = "type")]
    pub metric_type: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub unit: String,
}

/// Metadata keyed by metric name.
pub type MetricsMetadata = HashMap<String, MetricMetadata>;
