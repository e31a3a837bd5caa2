//! Suggestion generation.
//!
//! Classification runs synchronously first; only label-related contexts
//! touch the backend. Fetch failures never escape a completion call: they are
//! logged and the call resolves with no suggestions.

use tracing::{error, warn};

use super::LanguageProvider;
use crate::catalog;
use crate::context::selector::{EMPTY_SELECTOR, SelectorScope};
use crate::context::{Context, classify};
use crate::history::suggestions_from_history;
use crate::telemetry;
use crate::types::{
    CompletionResult, CompletionSnapshot, ContextTag, HistoryItem, Metric, Suggestion,
    SuggestionGroup,
};

pub const RANGE_GROUP: &str = "Range vector";
pub const FUNCTIONS_GROUP: &str = "Functions";
pub const METRICS_GROUP: &str = "Metrics";
pub const LABELS_GROUP: &str = "Labels";

impl LanguageProvider {
    /// Suggestions for the cursor position described by `snapshot`.
    ///
    /// `history` feeds the "History" group at metric positions.
    pub async fn provide_completion_items(
        &self,
        snapshot: &CompletionSnapshot,
        history: &[HistoryItem],
    ) -> CompletionResult {
        let context = classify(snapshot);
        metrics::counter!(telemetry::COMPLETIONS_TOTAL, "context" => context.kind()).increment(1);

        match context {
            Context::None => CompletionResult::empty(),
            Context::Range => {
                CompletionResult::with_context(ContextTag::Range, vec![range_group()])
            }
            Context::Labels(scope) => self.label_name_items(&scope).await,
            Context::LabelValues { label_key, scope } => {
                self.label_value_items(&label_key, &scope).await
            }
            Context::Aggregation { selector } => match selector {
                Some(selector) => self.aggregation_items(&selector).await,
                None => CompletionResult::empty(),
            },
            Context::MetricOrUnknown { prefix } => self.metric_items(&prefix, history),
        }
    }

    async fn label_name_items(&self, scope: &SelectorScope) -> CompletionResult {
        if self.lookups_blocked(&scope.selector) {
            return CompletionResult::empty();
        }

        let labels = if scope.is_empty() {
            self.default_labels().await
        } else {
            self.fetch_series_labels(&scope.selector, !scope.has_metric())
                .await
        };
        let labels = match labels {
            Ok(labels) => labels,
            Err(e) => {
                error!(selector = %scope.selector, error = %e, "failed to fetch label names");
                return CompletionResult::empty();
            }
        };

        if labels.is_empty() {
            warn!(selector = %scope.selector, "server did not return any values for selector");
            return CompletionResult::empty();
        }

        let names: Vec<String> = labels
            .names()
            .into_iter()
            .filter(|name| !scope.label_keys.contains(name))
            .collect();
        let mut suggestions = Vec::new();
        if !names.is_empty() {
            suggestions.push(self.limited_group(LABELS_GROUP, names));
        }
        CompletionResult::with_context(ContextTag::Labels, suggestions)
    }

    async fn label_value_items(&self, label_key: &str, scope: &SelectorScope) -> CompletionResult {
        if self.lookups_blocked(&scope.selector) {
            return CompletionResult::empty();
        }

        let values = if scope.is_empty() {
            match self.cache().label_values(label_key) {
                Some(values) => Ok(values.as_ref().clone()),
                None => self.fetch_label_values(label_key).await,
            }
        } else {
            self.fetch_label_values_matching(label_key, &scope.selector)
                .await
        };
        let values = match values {
            Ok(values) => values,
            Err(e) => {
                error!(
                    selector = %scope.selector,
                    label = label_key,
                    error = %e,
                    "failed to fetch label values"
                );
                return CompletionResult::empty();
            }
        };

        let mut suggestions = Vec::new();
        if !values.is_empty() {
            suggestions.push(self.limited_group(format!("Label values for \"{label_key}\""), values));
        }
        CompletionResult::with_context(ContextTag::LabelValues, suggestions)
    }

    async fn aggregation_items(&self, selector: &str) -> CompletionResult {
        if self.lookups_blocked(selector) {
            return CompletionResult::empty();
        }

        let labels = match self.fetch_series_labels(selector, false).await {
            Ok(labels) => labels,
            Err(e) => {
                error!(selector = %selector, error = %e, "failed to fetch aggregation labels");
                return CompletionResult::empty();
            }
        };
        if labels.is_empty() {
            warn!(selector = %selector, "server did not return any values for selector");
            return CompletionResult::empty();
        }

        CompletionResult::with_context(
            ContextTag::Aggregation,
            vec![self.limited_group(LABELS_GROUP, labels.names())],
        )
    }

    fn metric_items(&self, prefix: &str, history: &[HistoryItem]) -> CompletionResult {
        let mut suggestions = Vec::new();

        if let Some(group) = suggestions_from_history(history, prefix, self.config().history_limit) {
            suggestions.push(group);
        }

        suggestions.push(SuggestionGroup::new(
            FUNCTIONS_GROUP,
            catalog::all_functions().map(|f| f.to_suggestion()).collect(),
        ));

        let metrics = self.metrics();
        if metrics.is_empty() {
            return CompletionResult::without_context(suggestions);
        }

        let metadata = self.metrics_metadata();
        let items = metrics
            .iter()
            .map(|name| {
                let metric = match metadata.get(name) {
                    Some(meta) => Metric::named(name.as_str()).with_metadata(meta),
                    None => Metric::named(name.as_str()),
                };
                let suggestion = Suggestion::new(name.as_str());
                match metric.documentation() {
                    Some(doc) => suggestion.documentation(doc),
                    None => suggestion,
                }
            })
            .collect();
        suggestions.push(SuggestionGroup::new(METRICS_GROUP, items));

        CompletionResult::without_context(suggestions)
    }

    /// Whether lookups are disabled; warns with the selector that would
    /// have been fetched.
    fn lookups_blocked(&self, selector: &str) -> bool {
        if !self.datasource().lookups_disabled() {
            return false;
        }
        let selector = if selector.is_empty() { EMPTY_SELECTOR } else { selector };
        warn!(selector = %selector, "metadata lookups disabled, not fetching labels");
        true
    }

    /// Fuzzy group cut to the configured suggestions limit.
    fn limited_group(&self, label: impl Into<String>, mut names: Vec<String>) -> SuggestionGroup {
        let limit = self.config().suggestions_limit;
        let mut label = label.into();
        if names.len() > limit {
            names.truncate(limit);
            label.push_str(&format!(", limited to the first {limit} received items"));
        }
        SuggestionGroup::fuzzy(label, names)
    }
}

fn range_group() -> SuggestionGroup {
    SuggestionGroup::new(RANGE_GROUP, catalog::range_suggestions()).skip_sort()
}
