//! Find the metric an aggregation's grouping clause applies to.
//!
//! Both PromQL layouts are handled: `agg(expr) by (...)` and
//! `agg by (...) (expr)`. The operand is located by paren matching, so
//! unrelated expressions earlier or later in the query are never consulted.

use super::scan::{is_grouping_keyword, previous_word};
use super::selector::{SelectorScope, is_metric_char, is_metric_name, parse_selector, skip_string};
use crate::catalog;

/// Every `(` in `text` with its matching `)`, in source order, ignoring
/// parens inside strings and comments.
fn paren_pairs(text: &str) -> Vec<(usize, Option<usize>)> {
    let bytes = text.as_bytes();
    let mut pairs = Vec::new();
    let mut stack = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => match skip_string(bytes, i) {
                Some(end) => {
                    i = end;
                    continue;
                }
                None => break,
            },
            b'#' => match text[i..].find('\n') {
                Some(nl) => i += nl,
                None => break,
            },
            b'(' => {
                stack.push(pairs.len());
                pairs.push((i, None));
            }
            b')' => {
                if let Some(idx) = stack.pop() {
                    pairs[idx].1 = Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    pairs
}

fn close_of(pairs: &[(usize, Option<usize>)], open: usize) -> Option<usize> {
    pairs.iter().find(|(o, _)| *o == open).and_then(|(_, c)| *c)
}

fn open_of(pairs: &[(usize, Option<usize>)], close: usize) -> Option<usize> {
    pairs
        .iter()
        .find(|(_, c)| *c == Some(close))
        .map(|(o, _)| *o)
}

/// Selector aggregated by the `by`/`without` clause enclosing `cursor`.
///
/// `None` when the clause has no operand yet (`sum by ()`), when the word
/// before it is not an aggregation operator, or when the operand holds no
/// metric selector.
pub(super) fn aggregated_selector(text: &str, cursor: usize) -> Option<String> {
    let pairs = paren_pairs(text);
    let group_open = pairs
        .iter()
        .filter(|(open, close)| *open < cursor && close.is_none_or(|c| c >= cursor))
        .map(|(open, _)| *open)
        .max()?;

    let head = text[..group_open].trim_end();
    let keyword = previous_word(head);
    if !is_grouping_keyword(keyword) {
        return None;
    }
    let before_keyword = head[..head.len() - keyword.len()].trim_end();

    let (open, close) = if before_keyword.ends_with(')') {
        // agg(expr) by (...)
        let close = before_keyword.len() - 1;
        let open = open_of(&pairs, close)?;
        if !catalog::is_aggregation(previous_word(&text[..open])) {
            return None;
        }
        (open, close)
    } else {
        // agg by (...) (expr)
        if !catalog::is_aggregation(previous_word(before_keyword)) {
            return None;
        }
        let group_close = close_of(&pairs, group_open)?;
        let rest = &text[group_close + 1..];
        let open = group_close + 1 + (rest.len() - rest.trim_start().len());
        if !text[open..].starts_with('(') {
            return None;
        }
        (open, close_of(&pairs, open)?)
    };

    first_selector(last_argument(&text[open + 1..close]))
}

/// The vector operand of `topk(5, expr)` and friends: the last top-level
/// argument.
fn last_argument(args: &str) -> &str {
    let bytes = args.as_bytes();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => match skip_string(bytes, i) {
                Some(end) => {
                    i = end;
                    continue;
                }
                None => break,
            },
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => start = i + 1,
            _ => {}
        }
        i += 1;
    }

    &args[start..]
}

/// Words whose parenthesized list holds label names, not expressions.
fn takes_label_list(word: &str) -> bool {
    is_grouping_keyword(word)
        || ["on", "ignoring", "group_left", "group_right"]
            .iter()
            .any(|k| k.eq_ignore_ascii_case(word))
}

/// Normalized selector of the first metric reference in `expr`.
fn first_selector(expr: &str) -> Option<String> {
    let bytes = expr.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => i = skip_string(bytes, i)?,
            b'#' => i += expr[i..].find('\n')?,
            b'[' => i += expr[i..].find(']')? + 1,
            b'{' => {
                let close = i + expr[i..].find('}')?;
                return parse_selector(expr, close).ok().map(|scope| scope.selector);
            }
            b if b.is_ascii_digit() => {
                i += expr[i..]
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.'))
                    .unwrap_or(expr.len() - i);
            }
            b if b.is_ascii_alphabetic() || b == b'_' || b == b':' => {
                let end = i + expr[i..]
                    .find(|c: char| !is_metric_char(c))
                    .unwrap_or(expr.len() - i);
                let word = &expr[i..end];
                let rest = expr[end..].trim_start();

                if takes_label_list(word) {
                    i = end;
                    if rest.starts_with('(') {
                        i += expr[end..].find(')')? + 1;
                    }
                } else if rest.starts_with('{') {
                    let close = end + expr[end..].find('}')?;
                    return parse_selector(expr, close).ok().map(|scope| scope.selector);
                } else if rest.starts_with('(')
                    || catalog::is_keyword(word)
                    || catalog::is_function(word)
                    || !is_metric_name(word)
                {
                    i = end;
                } else {
                    return Some(SelectorScope::for_metric(word).selector);
                }
            }
            _ => i += 1,
        }
    }

    None
}
