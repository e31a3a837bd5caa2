//! Suggestion groups returned to the editor.

use serde::{Deserialize, Serialize};

/// Hint telling the UI how to match typed text against the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFunctionType {
    Prefix,
    Word,
    Fuzzy,
}

/// A single completion candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Suggestion {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn sort_value(mut self, value: impl Into<String>) -> Self {
        self.sort_value = Some(value.into());
        self
    }

    pub fn insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }
}

/// A named bundle of candidates presented together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionGroup {
    pub label: String,
    pub items: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_function_type: Option<SearchFunctionType>,
    /// Items are already in display order.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skip_sort: bool,
}

impl SuggestionGroup {
    pub fn new(label: impl Into<String>, items: Vec<Suggestion>) -> Self {
        Self {
            label: label.into(),
            items,
            search_function_type: None,
            skip_sort: false,
        }
    }

    /// Group of plain-label suggestions matched fuzzily by the UI.
    pub fn fuzzy<I, S>(label: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(label, names.into_iter().map(Suggestion::new).collect())
            .search_function_type(SearchFunctionType::Fuzzy)
    }

    pub fn search_function_type(mut self, kind: SearchFunctionType) -> Self {
        self.search_function_type = Some(kind);
        self
    }

    pub fn skip_sort(mut self) -> Self {
        self.skip_sort = true;
        self
    }

    /// Labels of all items, in order.
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|s| s.label.as_str()).collect()
    }
}

/// Context tag reported alongside suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextTag {
    #[serde(rename = "context-range")]
    Range,
    #[serde(rename = "context-labels")]
    Labels,
    #[serde(rename = "context-label-values")]
    LabelValues,
    #[serde(rename = "context-aggregation")]
    Aggregation,
}

impl ContextTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextTag::Range => "context-range",
            ContextTag::Labels => "context-labels",
            ContextTag::LabelValues => "context-label-values",
            ContextTag::Aggregation => "context-aggregation",
        }
    }
}

impl std::fmt::Display for ContextTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a completion request.
///
/// `suggestions` is always present, possibly empty. `context` is `None`
/// whenever the position was ambiguous or produced nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextTag>,
    pub suggestions: Vec<SuggestionGroup>,
}

impl CompletionResult {
    /// No context, no suggestions.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_context(context: ContextTag, suggestions: Vec<SuggestionGroup>) -> Self {
        Self {
            context: Some(context),
            suggestions,
        }
    }

    pub fn without_context(suggestions: Vec<SuggestionGroup>) -> Self {
        Self {
            context: None,
            suggestions,
        }
    }

    /// Find a group by its label.
    pub fn group(&self, label: &str) -> Option<&SuggestionGroup> {
        self.suggestions.iter().find(|g| g.label == label)
    }
}
