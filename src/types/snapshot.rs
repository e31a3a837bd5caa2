//! Neutral editor snapshot consumed by the context classifier.

use serde::{Deserialize, Serialize};

/// Structural hint describing what syntactic wrapper encloses the cursor.
///
/// Editors fill these from their own tokenizer; [`CompletionSnapshot::from_text`]
/// derives them from raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxHint {
    /// Inside `[...]` of a range vector.
    RangeBrackets,
    /// Inside `{...}` of a selector.
    LabelMatcher,
    /// Inside the parens of `by (...)` / `without (...)`.
    AggregationGrouping,
    /// Inside the value part of a label matcher.
    LabelValue,
    /// The token under the cursor is a recognized keyword, function or literal.
    RecognizedToken,
}

/// Text and cursor state at the moment completion was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSnapshot {
    /// Full query text (all lines).
    pub text: String,
    /// Word being typed immediately before the cursor.
    pub prefix: String,
    /// Byte offset of the cursor into `text`.
    pub cursor_offset: usize,
    #[serde(default)]
    pub hints: Vec<SyntaxHint>,
    /// Label whose value is being typed, when the editor knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_key: Option<String>,
}

impl CompletionSnapshot {
    /// Snapshot with the cursor at the end of `text` and no hints.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor_offset = text.len();
        Self {
            text,
            cursor_offset,
            ..Default::default()
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn cursor(mut self, offset: usize) -> Self {
        self.cursor_offset = offset;
        self
    }

    pub fn hint(mut self, hint: SyntaxHint) -> Self {
        if !self.hints.contains(&hint) {
            self.hints.push(hint);
        }
        self
    }

    pub fn label_key(mut self, key: impl Into<String>) -> Self {
        self.label_key = Some(key.into());
        self
    }

    pub fn has_hint(&self, hint: SyntaxHint) -> bool {
        self.hints.contains(&hint)
    }

    /// Cursor offset clamped into the text and moved back onto a char boundary.
    pub fn cursor_clamped(&self) -> usize {
        let mut offset = self.cursor_offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    /// Text before the cursor.
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.cursor_clamped()]
    }

    /// Text after the cursor.
    pub fn after_cursor(&self) -> &str {
        &self.text[self.cursor_clamped()..]
    }
}
