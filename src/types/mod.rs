//! Public types for the promql-assist API.

mod history;
mod metric;
mod query;
mod series;
mod snapshot;
mod suggestion;
mod time;

pub use history::{HistoryItem, HistoryQuery};
pub use metric::{Metric, MetricMetadata, MetricsMetadata};
pub use query::{AbstractLabelMatcher, AbstractLabelOperator, AbstractQuery, PromQuery};
pub use series::{Series, SeriesLabels};
pub use snapshot::{CompletionSnapshot, SyntaxHint};
pub use suggestion::{CompletionResult, ContextTag, SearchFunctionType, Suggestion, SuggestionGroup};
pub use time::{TimeRange, TimeRangeParams};
