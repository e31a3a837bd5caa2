//! Configuration file loading for the CLI.
#![cfg(feature = "cli")]

use promql_assist::DefaultLabelStrategy;
use promql_assist::client::Config;

#[test]
fn loads_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
            [client]
            base_url = "http://prometheus:9090"
            labels_match_api = true

            [client.limits]
            series = 500

            [client.variables]
            env = "prod"

            [provider]
            history_limit = 3

            [provider.default_labels]
            kind = "label_index"
        "#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.client.base_url, "http://prometheus:9090");
    assert!(config.client.labels_match_api);
    assert_eq!(config.client.limits["series"], 500);
    assert_eq!(config.client.variables["env"], "prod");
    assert_eq!(config.client.timeout_secs, 30);
    assert_eq!(config.provider.history_limit, 3);
    assert_eq!(config.provider.suggestions_limit, 10_000);
    assert_eq!(
        config.provider.default_labels,
        DefaultLabelStrategy::LabelIndex
    );
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn malformed_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[client\nbase_url = ").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, promql_assist::AssistError::Configuration(_)));
}
