//! Concrete and backend-agnostic query shapes.

use serde::{Deserialize, Serialize};

/// Label matching operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbstractLabelOperator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "=~")]
    EqualRegEx,
    #[serde(rename = "!~")]
    NotEqualRegEx,
}

impl AbstractLabelOperator {
    /// Parse one of `=`, `!=`, `=~`, `!~`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Self::Equal),
            "!=" => Some(Self::NotEqual),
            "=~" => Some(Self::EqualRegEx),
            "!~" => Some(Self::NotEqualRegEx),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::EqualRegEx => "=~",
            Self::NotEqualRegEx => "!~",
        }
    }
}

/// A `(label, operator, value)` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractLabelMatcher {
    pub name: String,
    pub operator: AbstractLabelOperator,
    pub value: String,
}

impl AbstractLabelMatcher {
    pub fn new(
        name: impl Into<String>,
        operator: AbstractLabelOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Backend-agnostic query used for cross-datasource portability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbstractQuery {
    pub ref_id: String,
    #[serde(default)]
    pub label_matchers: Vec<AbstractLabelMatcher>,
}

/// A PromQL query as stored by the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromQuery {
    pub ref_id: String,
    pub expr: String,
    #[serde(default)]
    pub range: bool,
}

impl PromQuery {
    pub fn new(ref_id: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            expr: expr.into(),
            range: true,
        }
    }
}
