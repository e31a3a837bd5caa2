//! promql-assist - context-aware completion for PromQL query editors
//!
//! This crate classifies the cursor position in a partially typed PromQL
//! query and returns suggestion groups (functions, metrics, labels, label
//! values, range literals, history) for it. Backend metadata is fetched
//! through the [`Datasource`] trait and cached per [`LanguageProvider`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use promql_assist::{ClientConfig, CompletionSnapshot, LanguageProvider, PrometheusClient};
//!
//! #[tokio::main]
//! async fn main() -> promql_assist::Result<()> {
//!     let client = PrometheusClient::new(ClientConfig::new("http://localhost:9090"))?;
//!     let provider = LanguageProvider::new(Arc::new(client));
//!
//!     for task in provider.start(None).await? {
//!         tokio::spawn(task);
//!     }
//!
//!     let query = "sum(rate(http_requests_total{";
//!     let snapshot = CompletionSnapshot::from_text(query, query.len());
//!     let result = provider.provide_completion_items(&snapshot, &[]).await;
//!     for group in &result.suggestions {
//!         println!("{}: {} items", group.label, group.items.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cancel;
pub mod catalog;
pub mod client;
pub mod context;
pub mod convert;
pub mod error;
pub mod history;
pub mod provider;
pub mod telemetry;
pub mod traits;
pub mod types;

// Re-export main types at crate root
pub use cancel::{CancelHandle, Cancelable, PreloadTask, cancelable};
pub use client::{ClientConfig, PrometheusClient};
pub use context::selector::{SelectorScope, parse_selector};
pub use context::{Context, classify};
pub use error::{AssistError, Result};
pub use history::suggestions_from_history;
pub use provider::{DefaultLabelStrategy, LanguageProvider, LanguageProviderBuilder, ProviderConfig};
pub use traits::{Datasource, RequestParams};

// Re-export all types
pub use types::{
    AbstractLabelMatcher, AbstractLabelOperator, AbstractQuery, CompletionResult,
    CompletionSnapshot, ContextTag, HistoryItem, HistoryQuery, Metric, MetricMetadata,
    MetricsMetadata, PromQuery, SearchFunctionType, Series, SeriesLabels, Suggestion,
    SuggestionGroup, SyntaxHint, TimeRange, TimeRangeParams,
};
