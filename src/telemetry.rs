//! Telemetry metric name constants.
//!
//! Centralised metric names for promql-assist operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `promql_assist_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `endpoint`: metadata endpoint key (e.g. "series", "label_values")
//! - `status`: outcome: "ok" or "error"
//! - `context`: classified completion context (e.g. "labels", "range")

/// Total metadata requests sent through the datasource seam.
///
/// Labels: `endpoint`, `status` ("ok" | "error").
pub const METADATA_REQUESTS_TOTAL: &str = "promql_assist_metadata_requests_total";

/// Total completion requests served.
///
/// Labels: `context`.
pub const COMPLETIONS_TOTAL: &str = "promql_assist_completions_total";

/// Total series-label cache hits.
pub const SERIES_CACHE_HITS_TOTAL: &str = "promql_assist_series_cache_hits_total";

/// Total series-label cache misses.
pub const SERIES_CACHE_MISSES_TOTAL: &str = "promql_assist_series_cache_misses_total";
