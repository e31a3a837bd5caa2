//! Derive a [`CompletionSnapshot`] from raw query text.
//!
//! Editors with their own tokenizer can fill the snapshot directly; this
//! scanner covers everything else (CLIs, tests, plain text areas). It tracks
//! bracket nesting up to the cursor, skipping string literals and comments.

use super::selector::{ends_with_operator, is_ident_char, is_metric_char, skip_string};
use crate::catalog;
use crate::types::{CompletionSnapshot, SyntaxHint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Brace,
    Bracket,
    Call,
    Grouping,
}

/// Build a snapshot for `text` with the cursor at byte offset `cursor`.
pub fn snapshot_at(text: &str, cursor: usize) -> CompletionSnapshot {
    let mut snapshot = CompletionSnapshot::new(text).cursor(cursor);
    let cursor = snapshot.cursor_clamped();
    let before = &text[..cursor];

    let prefix_start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_metric_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(cursor);
    let prefix = &before[prefix_start..];
    snapshot.prefix = prefix.to_string();

    let (stack, in_string) = nesting(before);

    match stack.last() {
        Some(Open::Bracket) => snapshot = snapshot.hint(SyntaxHint::RangeBrackets),
        Some(Open::Grouping) => snapshot = snapshot.hint(SyntaxHint::AggregationGrouping),
        Some(Open::Brace) => {
            snapshot = snapshot.hint(SyntaxHint::LabelMatcher);
            let before_token = &before[..prefix_start];
            let before_value = before_token.trim_end_matches(['"', '\'', '`']);
            if in_string || ends_with_operator(before_value) {
                snapshot = snapshot.hint(SyntaxHint::LabelValue);
                if let Some(key) = label_key_before(before_value) {
                    snapshot = snapshot.label_key(key);
                }
            }
        }
        Some(Open::Call) | None => {
            if is_recognized_token(prefix, &text[cursor..]) {
                snapshot = snapshot.hint(SyntaxHint::RecognizedToken);
            }
        }
    }

    snapshot
}

/// Open brackets before the cursor, innermost last, and whether the cursor
/// sits inside a string literal.
fn nesting(before: &str) -> (Vec<Open>, bool) {
    let bytes = before.as_bytes();
    let mut stack = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => match skip_string(bytes, i) {
                Some(end) => {
                    i = end;
                    continue;
                }
                None => {
                    // Double and single quotes stop at a newline.
                    if bytes[i] != b'`'
                        && let Some(nl) = before[i..].find('\n')
                    {
                        i += nl + 1;
                        continue;
                    }
                    return (stack, true);
                }
            },
            b'#' => match before[i..].find('\n') {
                Some(nl) => i += nl,
                None => break,
            },
            b'{' => stack.push(Open::Brace),
            b'[' => stack.push(Open::Bracket),
            b'(' => {
                let kind = if is_grouping_keyword(previous_word(&before[..i])) {
                    Open::Grouping
                } else {
                    Open::Call
                };
                stack.push(kind);
            }
            b'}' => pop_until(&mut stack, Open::Brace),
            b']' => pop_until(&mut stack, Open::Bracket),
            b')' => {
                if let Some(pos) = stack
                    .iter()
                    .rposition(|o| matches!(o, Open::Call | Open::Grouping))
                {
                    stack.truncate(pos);
                }
            }
            _ => {}
        }
        i += 1;
    }

    (stack, false)
}

fn pop_until(stack: &mut Vec<Open>, open: Open) {
    if let Some(pos) = stack.iter().rposition(|o| *o == open) {
        stack.truncate(pos);
    }
}

/// Last identifier before `text`'s end, skipping whitespace.
pub(super) fn previous_word(text: &str) -> &str {
    let text = text.trim_end();
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_ident_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[start..]
}

pub(super) fn is_grouping_keyword(word: &str) -> bool {
    word.eq_ignore_ascii_case("by") || word.eq_ignore_ascii_case("without")
}

/// Label name written right before a matching operator.
pub(super) fn label_key_before(before_value: &str) -> Option<String> {
    let without_op = before_value
        .trim_end_matches(['=', '~', '!'])
        .trim_end();
    let key = previous_word(without_op);
    (!key.is_empty() && !key.starts_with(|c: char| c.is_ascii_digit())).then(|| key.to_string())
}

/// Keywords, number and duration literals, and function names followed by
/// a call paren are tokens the editor would have highlighted.
fn is_recognized_token(prefix: &str, after: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    if catalog::is_keyword(prefix) || prefix.starts_with(|c: char| c.is_ascii_digit()) {
        return true;
    }
    after.trim_start().starts_with('(') && catalog::is_function(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_end(text: &str) -> CompletionSnapshot {
        snapshot_at(text, text.len())
    }

    #[test]
    fn range_brackets() {
        let s = at_end("rate(foo[");
        assert!(s.has_hint(SyntaxHint::RangeBrackets));
    }

    #[test]
    fn closed_range_is_not_range() {
        let s = at_end("rate(foo[5m]) + b");
        assert!(!s.has_hint(SyntaxHint::RangeBrackets));
        assert_eq!(s.prefix, "b");
    }

    #[test]
    fn label_name_position() {
        let s = at_end("foo{job=\"x\",");
        assert!(s.has_hint(SyntaxHint::LabelMatcher));
        assert!(!s.has_hint(SyntaxHint::LabelValue));
        assert_eq!(s.label_key, None);
    }

    #[test]
    fn label_value_position_unquoted() {
        let text = "metric{bar=ba}";
        let s = snapshot_at(text, 13);
        assert!(s.has_hint(SyntaxHint::LabelMatcher));
        assert!(s.has_hint(SyntaxHint::LabelValue));
        assert_eq!(s.label_key.as_deref(), Some("bar"));
        assert_eq!(s.prefix, "ba");
    }

    #[test]
    fn label_value_position_in_string() {
        let s = at_end("up{job=~\"api");
        assert!(s.has_hint(SyntaxHint::LabelValue));
        assert_eq!(s.label_key.as_deref(), Some("job"));
    }

    #[test]
    fn grouping_after_by() {
        let text = "sum(metric) by ()";
        let s = snapshot_at(text, 16);
        assert!(s.has_hint(SyntaxHint::AggregationGrouping));
    }

    #[test]
    fn grouping_multiline() {
        let text = "sum(\nmetric\n)\nby ()";
        let s = snapshot_at(text, text.len() - 1);
        assert!(s.has_hint(SyntaxHint::AggregationGrouping));
    }

    #[test]
    fn call_parens_are_not_grouping() {
        let s = at_end("sum(");
        assert!(s.hints.is_empty());
    }

    #[test]
    fn keywords_are_recognized() {
        assert!(at_end("sum(x) by").has_hint(SyntaxHint::RecognizedToken));
        assert!(!at_end("foo + b").has_hint(SyntaxHint::RecognizedToken));
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let s = at_end("foo{path=\"/{id}\"} + ba");
        assert!(!s.has_hint(SyntaxHint::LabelMatcher));
        assert_eq!(s.prefix, "ba");
    }

    #[test]
    fn comments_are_ignored() {
        let s = at_end("# rate(x[\nfoo");
        assert!(s.hints.is_empty());
        assert_eq!(s.prefix, "foo");
    }
}
