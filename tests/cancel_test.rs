//! Cancellation of the metadata preload.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MockDatasource;
use promql_assist::{LanguageProvider, cancelable};
use serde_json::json;

#[tokio::test]
async fn canceled_before_start_makes_no_requests() {
    let ds = Arc::new(MockDatasource::new().with_metrics(&["up"]));
    let provider = LanguageProvider::new(ds.clone());

    let (preload, handle) = provider.start_cancelable(None);
    handle.cancel();

    let err = preload.await.unwrap_err();
    assert!(err.is_canceled());
    assert_eq!(ds.call_count(), 0);
    assert!(provider.metrics().is_empty());
}

#[tokio::test]
async fn canceled_in_flight_never_commits() {
    let ds = Arc::new(
        MockDatasource::new()
            .with_metrics(&["up"])
            .delay(Duration::from_millis(200)),
    );
    let provider = LanguageProvider::new(ds.clone());

    let (preload, handle) = provider.start_cancelable(None);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });

    let err = preload.await.unwrap_err();
    assert!(err.is_canceled());
    assert_eq!(ds.call_count(), 2);
    assert!(provider.metrics().is_empty());
}

#[tokio::test]
async fn uncanceled_preload_completes() {
    let ds = Arc::new(MockDatasource::new().with_metrics(&["up"]));
    let provider = LanguageProvider::new(ds.clone());

    let (preload, _handle) = provider.start_cancelable(None);
    let tasks = preload.await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(*provider.metrics(), vec!["up"]);
}

#[tokio::test]
async fn deferred_task_can_be_canceled() {
    let ds = Arc::new(
        MockDatasource::new()
            .with_metrics(&["up"])
            .respond("/api/v1/labels", json!(["job"])),
    );
    let provider = LanguageProvider::new(ds.clone());

    let mut tasks = provider.start(None).await.unwrap();
    let task = tasks.remove(0);
    task.handle().cancel();

    assert!(task.await.unwrap_err().is_canceled());
    assert!(provider.label_keys().is_empty());
}

#[tokio::test]
async fn handle_reports_state() {
    let (fut, handle) = cancelable(async { Ok::<_, promql_assist::AssistError>(()) });
    assert!(!handle.is_canceled());
    handle.cancel();
    assert!(handle.is_canceled());
    assert!(fut.await.is_err());
}
