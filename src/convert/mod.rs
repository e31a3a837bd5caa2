//! Conversion between concrete PromQL queries and backend-agnostic
//! [`AbstractQuery`] matcher lists.

use crate::context::selector::{scan_matchers, trailing_metric};
use crate::types::{AbstractLabelMatcher, AbstractLabelOperator, AbstractQuery, PromQuery};

/// Build a query from abstract matchers.
///
/// Matchers are not turned into an expression: the result only carries the
/// ref id, an empty expression and `range: true`.
pub fn import_from_abstract_query(query: &AbstractQuery) -> PromQuery {
    PromQuery::new(query.ref_id.clone(), "")
}

/// Extract the selector matchers of `query`.
///
/// Matchers come in source order, followed by `__name__ = <metric>` when a
/// metric name precedes the first selector. Expressions without a selector
/// yield only the name matcher, or nothing.
pub fn export_to_abstract_query(query: &PromQuery) -> AbstractQuery {
    let expr = query.expr.as_str();

    let (matchers, metric) = match expr.find('{') {
        Some(open) => {
            let close = expr[open..]
                .find('}')
                .map(|rel| open + rel)
                .unwrap_or(expr.len());
            let matchers = scan_matchers(&expr[open..close], open)
                .into_iter()
                .map(|m| AbstractLabelMatcher::new(m.name, m.operator, m.value))
                .collect();
            (matchers, trailing_metric(&expr[..open]))
        }
        None => (Vec::new(), trailing_metric(expr)),
    };

    let mut label_matchers: Vec<AbstractLabelMatcher> = matchers;
    if let Some(metric) = metric {
        label_matchers.push(AbstractLabelMatcher::new(
            "__name__",
            AbstractLabelOperator::Equal,
            metric,
        ));
    }

    AbstractQuery {
        ref_id: query.ref_id.clone(),
        label_matchers,
    }
}
