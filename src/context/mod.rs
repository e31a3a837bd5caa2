//! Completion context classification.
//!
//! [`classify`] maps a [`CompletionSnapshot`] to the grammatical position of
//! the cursor. It never fails and never touches the network: anything it
//! cannot place becomes [`Context::None`].

mod aggregation;
pub mod scan;
pub mod selector;

use crate::types::{CompletionSnapshot, SyntaxHint};
use selector::{SelectorScope, ends_with_operator, parse_selector};

/// Where the cursor sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Ambiguous or unclassified position.
    None,
    /// Inside a range-duration literal `[...]`.
    Range,
    /// At a label name inside `{...}`.
    Labels(SelectorScope),
    /// At a label value, right after `key<op>`.
    LabelValues {
        label_key: String,
        scope: SelectorScope,
    },
    /// Inside `by (...)` / `without (...)`; `selector` is the aggregated
    /// metric selector when one could be found.
    Aggregation { selector: Option<String> },
    /// Metric name, function or nothing in particular.
    MetricOrUnknown { prefix: String },
}

impl Context {
    /// Short name used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Context::None => "none",
            Context::Range => "range",
            Context::Labels(_) => "labels",
            Context::LabelValues { .. } => "label_values",
            Context::Aggregation { .. } => "aggregation",
            Context::MetricOrUnknown { .. } => "metric_or_unknown",
        }
    }
}

impl CompletionSnapshot {
    /// Build a snapshot from raw text, deriving prefix, hints and label key.
    pub fn from_text(text: impl Into<String>, cursor: usize) -> Self {
        scan::snapshot_at(&text.into(), cursor)
    }
}

/// Determine the completion context at the snapshot's cursor.
pub fn classify(snapshot: &CompletionSnapshot) -> Context {
    if snapshot.text.is_empty() {
        return Context::None;
    }

    if snapshot.has_hint(SyntaxHint::RangeBrackets) {
        return Context::Range;
    }

    if snapshot.has_hint(SyntaxHint::LabelMatcher) {
        return classify_labels(snapshot);
    }

    if snapshot.has_hint(SyntaxHint::AggregationGrouping) {
        return Context::Aggregation {
            selector: aggregation::aggregated_selector(
                &snapshot.text,
                snapshot.cursor_clamped(),
            ),
        };
    }

    if snapshot.has_hint(SyntaxHint::RecognizedToken) || snapshot.prefix.is_empty() {
        return Context::None;
    }

    // Mid-word: only complete at the end of a token.
    match snapshot.after_cursor().chars().next() {
        None | Some(')') => {}
        Some(c) if c.is_whitespace() => {}
        Some(_) => return Context::None,
    }

    Context::MetricOrUnknown {
        prefix: snapshot.prefix.clone(),
    }
}

fn classify_labels(snapshot: &CompletionSnapshot) -> Context {
    let cursor = snapshot.cursor_clamped();
    let before = snapshot.before_cursor();
    let after = snapshot.after_cursor();

    // `key=|"value"`: the value is already quoted, nothing to insert here.
    if ends_with_operator(before) && after.starts_with('"') {
        return Context::None;
    }

    let scope = parse_selector(&snapshot.text, cursor).unwrap_or_else(|_| SelectorScope::empty());

    let before_prefix = before.strip_suffix(snapshot.prefix.as_str()).unwrap_or(before);
    let before_value = before_prefix.trim_end_matches(['"', '\'', '`']);
    let in_value = snapshot.has_hint(SyntaxHint::LabelValue) || ends_with_operator(before_value);

    if !in_value {
        return Context::Labels(scope);
    }

    match snapshot
        .label_key
        .clone()
        .or_else(|| scan::label_key_before(before_value))
    {
        Some(label_key) => Context::LabelValues { label_key, scope },
        None => Context::None,
    }
}
