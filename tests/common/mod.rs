//! Shared test fixtures: an in-memory datasource that counts requests and a
//! tracing layer that captures warnings.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt::{Debug, Write};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use promql_assist::{AssistError, Datasource, RequestParams, Result, TimeRangeParams};
use serde_json::{Value, json};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Datasource answering from a url → data table and recording every call.
#[derive(Default)]
pub struct MockDatasource {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<(String, RequestParams)>>,
    total_calls: AtomicU32,
    delay: Option<Duration>,
    fail: bool,
    lookups_disabled: bool,
    labels_match: bool,
    limits: HashMap<String, u64>,
    variables: HashMap<String, String>,
}

impl MockDatasource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, data: Value) -> Self {
        self.responses.insert(url.to_string(), data);
        self
    }

    /// Answer `/api/v1/label/job/values` and `/api/v1/label/instance/values`.
    pub fn with_default_labels(self) -> Self {
        self.respond("/api/v1/label/job/values", json!(["api", "node"]))
            .respond("/api/v1/label/instance/values", json!(["host:9090"]))
    }

    /// Answer the metric-name preload with `names` and empty metadata.
    pub fn with_metrics(self, names: &[&str]) -> Self {
        self.respond("/api/v1/label/__name__/values", json!(names))
            .respond("/api/v1/metadata", json!({}))
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn lookups_disabled(mut self) -> Self {
        self.lookups_disabled = true;
        self
    }

    pub fn labels_match(mut self) -> Self {
        self.labels_match = true;
        self
    }

    pub fn limit(mut self, key: &str, limit: u64) -> Self {
        self.limits.insert(key.to_string(), limit);
        self
    }

    pub fn variable(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }

    pub fn call_count(&self) -> u32 {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<(String, RequestParams)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|(url, _)| url).collect()
    }
}

#[async_trait]
impl Datasource for MockDatasource {
    async fn get_request(&self, url: &str, params: &RequestParams) -> Result<Value> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), params.clone()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(AssistError::Http("connection refused".into()));
        }
        Ok(self.responses.get(url).cloned().unwrap_or_else(|| json!([])))
    }

    fn time_range_params(&self) -> TimeRangeParams {
        TimeRangeParams {
            start: "1600000000".into(),
            end: "1600003600".into(),
        }
    }

    fn interpolate_string(&self, value: &str) -> String {
        self.variables
            .iter()
            .fold(value.to_string(), |acc, (name, replacement)| {
                acc.replace(&format!("${name}"), replacement)
            })
    }

    fn limit_metrics(&self, key: &str) -> u64 {
        self.limits.get(key).copied().unwrap_or(0)
    }

    fn lookups_disabled(&self) -> bool {
        self.lookups_disabled
    }

    fn has_labels_match_api_support(&self) -> bool {
        self.labels_match
    }
}

/// Value of `key` in recorded request params.
pub fn param<'a>(params: &'a RequestParams, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Layer recording every WARN-or-worse event as `field=value` text.
#[derive(Clone, Default)]
pub struct CapturedWarnings(Arc<Mutex<Vec<String>>>);

impl CapturedWarnings {
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl<S: Subscriber> Layer<S> for CapturedWarnings {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() > Level::WARN {
            return;
        }
        let mut visitor = FieldText::default();
        event.record(&mut visitor);
        self.0.lock().unwrap().push(visitor.0);
    }
}

#[derive(Default)]
struct FieldText(String);

impl Visit for FieldText {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}

/// Capture warnings on the current thread until the guard drops.
pub fn capture_warnings() -> (CapturedWarnings, tracing::subscriber::DefaultGuard) {
    use tracing_subscriber::layer::SubscriberExt;

    let captured = CapturedWarnings::default();
    let subscriber = tracing_subscriber::registry().with(captured.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (captured, guard)
}
