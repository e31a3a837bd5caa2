//! Core Datasource trait

use async_trait::async_trait;

use crate::Result;
use crate::types::TimeRangeParams;

/// Query parameters for a metadata request, in insertion order.
pub type RequestParams = Vec<(String, String)>;

/// The backend connection a [`LanguageProvider`](crate::LanguageProvider) is bound to.
///
/// Every metadata request the provider makes goes through
/// [`get_request`](Self::get_request), so implementations can count,
/// authenticate or stub calls in one place. Transport and HTTP concerns live
/// entirely behind this trait.
#[async_trait]
pub trait Datasource: Send + Sync {
    /// Issue a metadata GET and return the payload's `data` member.
    async fn get_request(&self, url: &str, params: &RequestParams) -> Result<serde_json::Value>;

    /// `start`/`end` bounds (unix seconds) for metadata queries.
    fn time_range_params(&self) -> TimeRangeParams;

    /// Substitute template variables in `value`.
    fn interpolate_string(&self, value: &str) -> String {
        value.to_string()
    }

    /// Per-endpoint result cap. `0` means unbounded.
    fn limit_metrics(&self, _key: &str) -> u64 {
        0
    }

    /// Global kill-switch for metadata fetching.
    fn lookups_disabled(&self) -> bool {
        false
    }

    /// Whether `/api/v1/labels` and `/api/v1/label/<name>/values` accept `match[]`.
    fn has_labels_match_api_support(&self) -> bool {
        false
    }
}
