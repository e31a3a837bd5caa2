//! Lightweight selector scanning.
//!
//! Not a PromQL parser: it only finds `metric{key<op>"value", ...}` shapes
//! around a cursor and normalizes them into a selector string suitable for
//! the series endpoints.

use crate::types::AbstractLabelOperator;
use crate::{AssistError, Result};

/// The selector matching every series.
pub const EMPTY_SELECTOR: &str = "{}";

/// A matcher found in query text, with byte offsets of its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatcher {
    pub name: String,
    pub operator: AbstractLabelOperator,
    /// Value without its quotes, escapes left untouched.
    pub value: String,
    /// Offset of the first value character (just after the opening quote).
    pub value_start: usize,
    /// Offset of the closing quote.
    pub value_end: usize,
}

/// Normalized selector around a cursor, plus what it already constrains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorScope {
    /// Sorted, cleaned selector, e.g. `{__name__="up",job="api"}`.
    pub selector: String,
    /// Label keys present in the selector, sorted; includes `__name__` when a
    /// metric precedes the braces.
    pub label_keys: Vec<String>,
    /// Metric name written before the braces.
    pub metric: Option<String>,
}

impl SelectorScope {
    /// Scope that constrains nothing.
    pub fn empty() -> Self {
        Self {
            selector: EMPTY_SELECTOR.to_string(),
            label_keys: Vec::new(),
            metric: None,
        }
    }

    /// Scope for a bare metric name.
    pub fn for_metric(metric: &str) -> Self {
        Self {
            selector: format!("{{__name__=\"{metric}\"}}"),
            label_keys: vec!["__name__".to_string()],
            metric: Some(metric.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selector == EMPTY_SELECTOR
    }

    /// Whether the selector pins a metric name.
    pub fn has_metric(&self) -> bool {
        self.selector.contains("__name__=")
    }
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub(crate) fn is_metric_char(c: char) -> bool {
    is_ident_char(c) || c == ':'
}

/// Whether `s` is a plain metric name (`[A-Za-z_:][A-Za-z0-9_:]*`).
pub fn is_metric_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => chars.all(is_metric_char),
        _ => false,
    }
}

/// Metric name ending exactly at the end of `text`, ignoring trailing spaces.
pub fn trailing_metric(text: &str) -> Option<&str> {
    let text = text.trim_end();
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_metric_char(*c))
        .last()
        .map(|(i, _)| i)?;
    let candidate = &text[start..];
    // Leading digits are not part of a name: `5m{` is not a metric.
    let skip = candidate
        .find(|c: char| c.is_ascii_alphabetic() || c == '_' || c == ':')
        .unwrap_or(candidate.len());
    let name = &candidate[skip..];
    is_metric_name(name).then_some(name)
}

/// Find every `name<op>"value"` matcher in `text`.
///
/// `base` is added to the reported value offsets.
pub fn scan_matchers(text: &str, base: usize) -> Vec<RawMatcher> {
    let bytes = text.as_bytes();
    let mut matchers = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;

        if c == '"' || c == '\'' || c == '`' {
            i = skip_string(bytes, i).unwrap_or(bytes.len());
            continue;
        }

        let at_word_start = i == 0 || !is_ident_char(bytes[i - 1] as char);
        if !(at_word_start && (c.is_ascii_alphabetic() || c == '_')) {
            i += 1;
            continue;
        }

        let name_start = i;
        while i < bytes.len() && is_ident_char(bytes[i] as char) {
            i += 1;
        }
        let name = &text[name_start..i];

        let mut j = skip_spaces(bytes, i);
        let Some((operator, op_len)) = operator_at(&text[j..]) else {
            continue;
        };
        j = skip_spaces(bytes, j + op_len);

        if j >= bytes.len() || !matches!(bytes[j], b'"' | b'\'' | b'`') {
            i = j;
            continue;
        }
        let Some(end) = skip_string(bytes, j) else {
            // Unterminated value: nothing further can be a complete matcher.
            break;
        };
        matchers.push(RawMatcher {
            name: name.to_string(),
            operator,
            value: text[j + 1..end - 1].to_string(),
            value_start: base + j + 1,
            value_end: base + end - 1,
        });
        i = end;
    }

    matchers
}

/// Operator at the start of `s`, longest match first.
fn operator_at(s: &str) -> Option<(AbstractLabelOperator, usize)> {
    for symbol in ["!=", "!~", "=~", "="] {
        if s.starts_with(symbol) {
            return AbstractLabelOperator::from_symbol(symbol).map(|op| (op, symbol.len()));
        }
    }
    None
}

/// Whether `text` ends with a matching operator.
pub fn ends_with_operator(text: &str) -> bool {
    ["=", "!=", "=~", "!~"].iter().any(|op| text.ends_with(op))
}

fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i] as char).is_whitespace() {
        i += 1;
    }
    i
}

/// Index just past the string literal starting at `start`, or `None` when
/// it is not terminated. Double and single quoted strings end at a newline.
pub(crate) fn skip_string(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote != b'`' => i += 2,
            b'\n' if quote != b'`' => return None,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Normalize the selector enclosing `cursor` in `query`.
///
/// A query that is just a metric name yields `{__name__="<name>"}`. Matchers
/// whose value contains the cursor are dropped since they are still being
/// typed, as are incomplete matchers. Keys are sorted.
pub fn parse_selector(query: &str, cursor: usize) -> Result<SelectorScope> {
    if !query.contains('{') {
        if is_metric_name(query) {
            return Ok(SelectorScope::for_metric(query));
        }
        return Err(AssistError::InvalidSelector(format!(
            "query must contain a selector: {query}"
        )));
    }

    let mut cursor = cursor.min(query.len());
    while !query.is_char_boundary(cursor) {
        cursor -= 1;
    }

    let prefix = &query[..cursor];
    let Some(open) = prefix.rfind('{') else {
        return Err(AssistError::InvalidSelector(format!(
            "not inside selector, missing open brace: {prefix}"
        )));
    };
    if prefix.rfind('}').is_some_and(|close| close > open) {
        return Err(AssistError::InvalidSelector(format!(
            "not inside selector, previous selector already closed: {prefix}"
        )));
    }

    let suffix = &query[cursor..];
    let Some(close_rel) = suffix.find('}') else {
        return Err(AssistError::InvalidSelector(format!(
            "not inside selector, missing closing brace in suffix: {suffix}"
        )));
    };
    if suffix.find('{').is_some_and(|next_open| next_open < close_rel) {
        return Err(AssistError::InvalidSelector(format!(
            "not inside selector, next selector opens before this one closed: {suffix}"
        )));
    }
    let close = cursor + close_rel;

    let mut labels: Vec<(String, String)> = Vec::new();
    for m in scan_matchers(&query[open..close], open) {
        if cursor >= m.value_start && cursor <= m.value_end {
            continue;
        }
        let rendered = format!("{}\"{}\"", m.operator.as_symbol(), m.value);
        match labels.iter_mut().find(|(k, _)| *k == m.name) {
            Some(entry) => entry.1 = rendered,
            None => labels.push((m.name, rendered)),
        }
    }

    let metric = trailing_metric(&query[..open]).map(str::to_string);
    if let Some(ref name) = metric {
        labels.retain(|(k, _)| k != "__name__");
        labels.push(("__name__".to_string(), format!("=\"{name}\"")));
    }

    labels.sort_by(|a, b| a.0.cmp(&b.0));
    let body = labels
        .iter()
        .map(|(k, rest)| format!("{k}{rest}"))
        .collect::<Vec<_>>()
        .join(",");

    Ok(SelectorScope {
        selector: format!("{{{body}}}"),
        label_keys: labels.into_iter().map(|(k, _)| k).collect(),
        metric,
    })
}
