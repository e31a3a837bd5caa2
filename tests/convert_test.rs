//! Abstract query bridge.

mod common;

use std::sync::Arc;

use common::MockDatasource;
use promql_assist::{
    AbstractLabelMatcher, AbstractLabelOperator, AbstractQuery, LanguageProvider, PromQuery,
};

fn provider() -> LanguageProvider {
    LanguageProvider::new(Arc::new(MockDatasource::new()))
}

#[test]
fn export_keeps_matcher_order_then_metric_name() {
    let query = PromQuery::new(
        "A",
        r#"metric_name{label1="value1", label2!="value2", label3=~"value3", label4!~"value4"}"#,
    );

    let exported = provider().export_to_abstract_query(&query);

    assert_eq!(exported.ref_id, "A");
    assert_eq!(
        exported.label_matchers,
        vec![
            AbstractLabelMatcher::new("label1", AbstractLabelOperator::Equal, "value1"),
            AbstractLabelMatcher::new("label2", AbstractLabelOperator::NotEqual, "value2"),
            AbstractLabelMatcher::new("label3", AbstractLabelOperator::EqualRegEx, "value3"),
            AbstractLabelMatcher::new("label4", AbstractLabelOperator::NotEqualRegEx, "value4"),
            AbstractLabelMatcher::new("__name__", AbstractLabelOperator::Equal, "metric_name"),
        ]
    );
}

#[test]
fn export_reads_selector_inside_functions() {
    let query = PromQuery::new("A", r#"sum(rate(http_total{code=~"5.."}[5m]))"#);
    let exported = provider().export_to_abstract_query(&query);
    assert_eq!(
        exported.label_matchers,
        vec![
            AbstractLabelMatcher::new("code", AbstractLabelOperator::EqualRegEx, "5.."),
            AbstractLabelMatcher::new("__name__", AbstractLabelOperator::Equal, "http_total"),
        ]
    );
}

#[test]
fn import_yields_empty_range_query() {
    let imported = provider().import_from_abstract_query(&AbstractQuery {
        ref_id: "bar".into(),
        label_matchers: vec![],
    });
    assert_eq!(
        imported,
        PromQuery {
            ref_id: "bar".into(),
            expr: String::new(),
            range: true,
        }
    );
}

#[test]
fn abstract_query_serializes_with_operator_symbols() {
    let exported = provider().export_to_abstract_query(&PromQuery::new("A", r#"up{job!="x"}"#));
    let json = serde_json::to_value(&exported).unwrap();
    assert_eq!(json["refId"], "A");
    assert_eq!(json["labelMatchers"][0]["operator"], "!=");
}
