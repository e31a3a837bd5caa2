//! Time bounds for metadata queries.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Time window in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Window ending now and reaching `lookback` into the past.
    pub fn last(lookback: Duration) -> Self {
        let end = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        Self {
            start: end - lookback.as_secs() as i64,
            end,
        }
    }

    pub fn to_params(&self) -> TimeRangeParams {
        TimeRangeParams {
            start: self.start.to_string(),
            end: self.end.to_string(),
        }
    }
}

/// `start`/`end` request parameters as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangeParams {
    pub start: String,
    pub end: String,
}

impl TimeRangeParams {
    /// Both bounds rounded down to the minute, for cache keys.
    ///
    /// Unparseable bounds are kept verbatim.
    pub fn rounded_to_minute(&self) -> (String, String) {
        let round = |v: &str| {
            v.parse::<f64>()
                .map(|secs| ((secs / 60.0).floor() as i64 * 60).to_string())
                .unwrap_or_else(|_| v.to_string())
        };
        (round(&self.start), round(&self.end))
    }
}
