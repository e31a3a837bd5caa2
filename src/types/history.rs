//! Previously run queries supplied by the host application.

use serde::{Deserialize, Serialize};

/// The query part of a history entry. Only `expr` is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,
}

/// A previously run query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub query: HistoryQuery,
    /// Unix time in milliseconds.
    #[serde(default)]
    pub ts: i64,
}

impl HistoryItem {
    pub fn new(expr: impl Into<String>, ts: i64) -> Self {
        Self {
            query: HistoryQuery {
                expr: Some(expr.into()),
            },
            ts,
        }
    }

    pub fn expr(&self) -> Option<&str> {
        self.query.expr.as_deref()
    }
}
