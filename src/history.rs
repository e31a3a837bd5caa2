//! Query history suggestions.

use chrono::{DateTime, Utc};

use crate::types::{HistoryItem, Suggestion, SuggestionGroup};

/// Label of the history group.
pub const HISTORY_GROUP: &str = "History";

/// Turn previously run queries into a "History" group.
///
/// Items without an expression are dropped and duplicates are folded into
/// one entry that remembers how often and when last the query ran. Entries
/// are ordered most recent first, filtered by `prefix` (all of them when the
/// prefix is empty) and capped at `limit`. Returns `None` when nothing is left.
pub fn suggestions_from_history(
    history: &[HistoryItem],
    prefix: &str,
    limit: usize,
) -> Option<SuggestionGroup> {
    let mut sorted: Vec<&HistoryItem> = history.iter().collect();
    sorted.sort_by(|a, b| b.ts.cmp(&a.ts));

    // (expr, run count, latest ts), in recency order
    let mut entries: Vec<(&str, usize, i64)> = Vec::new();
    for item in sorted {
        let Some(expr) = item.expr().filter(|e| !e.is_empty()) else {
            continue;
        };
        match entries.iter_mut().find(|(e, _, _)| *e == expr) {
            Some(entry) => entry.1 += 1,
            None => entries.push((expr, 1, item.ts)),
        }
    }

    let items: Vec<Suggestion> = entries
        .into_iter()
        .filter(|(expr, _, _)| prefix.is_empty() || expr.starts_with(prefix))
        .take(limit)
        .map(|(expr, count, ts)| {
            Suggestion::new(expr).documentation(format!(
                "Run {count} times, last run at {}",
                format_timestamp(ts)
            ))
        })
        .collect();

    (!items.is_empty()).then(|| SuggestionGroup::new(HISTORY_GROUP, items).skip_sort())
}

fn format_timestamp(ts_millis: i64) -> String {
    DateTime::from_timestamp_millis(ts_millis)
        .map(|dt: DateTime<Utc>| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts_millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HistoryQuery;

    #[test]
    fn empty_history_is_none() {
        assert!(suggestions_from_history(&[], "", 5).is_none());
    }

    #[test]
    fn dedupes_and_orders_by_recency() {
        let history = vec![
            HistoryItem::new("up", 1_000),
            HistoryItem::new("rate(x[5m])", 3_000),
            HistoryItem::new("up", 2_000),
        ];
        let group = suggestions_from_history(&history, "", 5).unwrap();
        assert_eq!(group.label, HISTORY_GROUP);
        assert_eq!(group.labels(), vec!["rate(x[5m])", "up"]);
        assert!(group.skip_sort);
        assert_eq!(
            group.items[1].documentation.as_deref(),
            Some("Run 2 times, last run at 1970-01-01 00:00:02 UTC")
        );
    }

    #[test]
    fn filters_by_prefix() {
        let history = vec![HistoryItem::new("up", 1), HistoryItem::new("foo", 2)];
        let group = suggestions_from_history(&history, "fo", 5).unwrap();
        assert_eq!(group.labels(), vec!["foo"]);
        assert!(suggestions_from_history(&history, "zzz", 5).is_none());
    }

    #[test]
    fn items_without_expr_are_dropped() {
        let history = vec![HistoryItem {
            query: HistoryQuery { expr: None },
            ts: 1,
        }];
        assert!(suggestions_from_history(&history, "", 5).is_none());
    }

    #[test]
    fn respects_limit() {
        let history: Vec<_> = (0..10)
            .map(|i| HistoryItem::new(format!("q{i}"), i))
            .collect();
        let group = suggestions_from_history(&history, "", 5).unwrap();
        assert_eq!(group.items.len(), 5);
        assert_eq!(group.items[0].label, "q9");
    }
}
