//! Counters emitted by the provider.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

mod common;

use std::future::Future;
use std::sync::Arc;

use common::MockDatasource;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use promql_assist::{CompletionSnapshot, LanguageProvider, telemetry};
use serde_json::json;

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum of the counters named `name` carrying every label in `labels`.
fn counter(snapshot: &SnapshotVec, name: &str, labels: &[(&str, &str)]) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| {
            labels.iter().all(|(k, v)| {
                key.key()
                    .labels()
                    .any(|label| label.key() == *k && label.value() == *v)
            })
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Run `fut` with a local recorder installed and return what it recorded.
///
/// `block_in_place` keeps the sync `with_local_recorder` closure on the
/// current thread while `block_on` drives the async work.
fn recorded<F: Future>(fut: F) -> (F::Output, SnapshotVec) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let output = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(fut))
    });
    (output, snapshotter.snapshot().into_vec())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn preload_counts_requests_per_endpoint() {
    let provider = LanguageProvider::new(Arc::new(MockDatasource::new().with_metrics(&["up"])));

    let (result, snapshot) = recorded(provider.start(None));
    assert!(result.is_ok());

    let name = telemetry::METADATA_REQUESTS_TOTAL;
    assert_eq!(
        counter(&snapshot, name, &[("endpoint", "label_values"), ("status", "ok")]),
        1
    );
    assert_eq!(
        counter(&snapshot, name, &[("endpoint", "metadata"), ("status", "ok")]),
        1
    );
    assert_eq!(counter(&snapshot, name, &[("status", "error")]), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_requests_are_counted_as_errors() {
    let provider = LanguageProvider::new(Arc::new(MockDatasource::new().failing()));

    let (result, snapshot) = recorded(provider.fetch_labels());
    assert!(result.is_err());

    let name = telemetry::METADATA_REQUESTS_TOTAL;
    assert_eq!(
        counter(&snapshot, name, &[("endpoint", "labels"), ("status", "error")]),
        1
    );
    assert_eq!(counter(&snapshot, name, &[("status", "ok")]), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn completions_are_counted_by_context() {
    let provider = LanguageProvider::new(Arc::new(MockDatasource::new()));

    let (_, snapshot) = recorded(async {
        provider
            .provide_completion_items(&CompletionSnapshot::from_text("rate(foo[", 9), &[])
            .await;
        provider
            .provide_completion_items(&CompletionSnapshot::from_text("rate(foo[", 9), &[])
            .await;
        provider
            .provide_completion_items(&CompletionSnapshot::new(""), &[])
            .await;
    });

    let name = telemetry::COMPLETIONS_TOTAL;
    assert_eq!(counter(&snapshot, name, &[("context", "range")]), 2);
    assert_eq!(counter(&snapshot, name, &[("context", "none")]), 1);
    assert_eq!(counter(&snapshot, name, &[]), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn repeated_label_lookup_hits_series_cache() {
    let ds = Arc::new(MockDatasource::new().respond(
        "/api/v1/series",
        json!([{ "__name__": "up", "job": "api" }]),
    ));
    let provider = LanguageProvider::new(ds.clone());
    let snapshot = CompletionSnapshot::from_text("up{}", 3);

    let (_, captured) = recorded(async {
        provider.provide_completion_items(&snapshot, &[]).await;
        provider.provide_completion_items(&snapshot, &[]).await;
    });

    assert_eq!(counter(&captured, telemetry::SERIES_CACHE_MISSES_TOTAL, &[]), 1);
    assert_eq!(counter(&captured, telemetry::SERIES_CACHE_HITS_TOTAL, &[]), 1);
    assert_eq!(
        counter(
            &captured,
            telemetry::METADATA_REQUESTS_TOTAL,
            &[("endpoint", "series")]
        ),
        1
    );
    assert_eq!(ds.call_count(), 1);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    let provider = LanguageProvider::new(Arc::new(MockDatasource::new().with_metrics(&["up"])));
    provider.start(None).await.unwrap();
}
