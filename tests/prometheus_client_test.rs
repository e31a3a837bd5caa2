//! Wiremock integration tests for [`PrometheusClient`].
//!
//! Covers envelope unwrapping, error mapping, query parameters and a full
//! completion round trip through the provider.

use std::sync::Arc;

use promql_assist::{
    AssistError, ClientConfig, CompletionSnapshot, ContextTag, Datasource, LanguageProvider,
    PrometheusClient,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn success(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "data": data }))
}

fn client(server: &MockServer) -> PrometheusClient {
    PrometheusClient::new(ClientConfig::new(server.uri())).unwrap()
}

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn get_request_returns_data_member() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/labels"))
        .and(query_param("match[]", "{job=\"api\"}"))
        .and(query_param("limit", "0"))
        .respond_with(success(json!(["job", "instance"])))
        .expect(1)
        .mount(&server)
        .await;

    let data = client(&server)
        .get_request(
            "/api/v1/labels",
            &params(&[("limit", "0"), ("match[]", "{job=\"api\"}")]),
        )
        .await
        .unwrap();
    assert_eq!(data, json!(["job", "instance"]));
}

#[tokio::test]
async fn error_envelope_maps_to_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "errorType": "execution",
            "error": "too many series"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_request("/api/v1/series", &Vec::new())
        .await
        .unwrap_err();
    match err {
        AssistError::Backend(message) => assert_eq!(message, "too many series"),
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_status_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/series"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "errorType": "bad_data",
            "error": "1:5: parse error"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_request("/api/v1/series", &Vec::new())
        .await
        .unwrap_err();
    match err {
        AssistError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "1:5: parse error");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_request("/api/v1/labels", &Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AssistError::Api { status: 503, .. }));
}

#[tokio::test]
async fn config_drives_datasource_hooks() {
    let config = ClientConfig::new("http://localhost:1")
        .limit("series", 40)
        .labels_match_api(true)
        .lookback_secs(600)
        .variable("job", "api");
    let client = PrometheusClient::new(config).unwrap();

    assert_eq!(client.limit_metrics("series"), 40);
    assert_eq!(client.limit_metrics("labels"), 0);
    assert!(client.has_labels_match_api_support());
    assert!(!client.lookups_disabled());
    assert_eq!(client.interpolate_string("{job=\"$job\"}"), "{job=\"api\"}");

    let range = client.time_range_params();
    let start: i64 = range.start.parse().unwrap();
    let end: i64 = range.end.parse().unwrap();
    assert_eq!(end - start, 600);
}

#[tokio::test]
async fn provider_completes_label_values_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/series"))
        .and(query_param("match[]", "{__name__=\"up\"}"))
        .and(query_param("limit", "25"))
        .respond_with(success(json!([
            { "__name__": "up", "job": "api" },
            { "__name__": "up", "job": "node" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri()).limit("series", 25);
    let provider = LanguageProvider::new(Arc::new(PrometheusClient::new(config).unwrap()));

    let text = "up{job=}";
    let result = provider
        .provide_completion_items(&CompletionSnapshot::from_text(text, text.len() - 1), &[])
        .await;

    assert_eq!(result.context, Some(ContextTag::LabelValues));
    assert_eq!(result.suggestions[0].labels(), vec!["api", "node"]);
}

#[tokio::test]
async fn disabled_lookups_never_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri()).lookups_disabled(true);
    let provider = LanguageProvider::new(Arc::new(PrometheusClient::new(config).unwrap()));

    assert!(provider.start(None).await.unwrap().is_empty());
    let result = provider
        .provide_completion_items(&CompletionSnapshot::from_text("{}", 1), &[])
        .await;
    assert!(result.suggestions.is_empty());
}
