//! promql-assist error types

/// promql-assist error types
///
/// `Clone` so a memoized fetch outcome can be handed to every waiter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssistError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Backend answered with a `status: "error"` envelope.
    #[error("backend error: {0}")]
    Backend(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(String),

    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A cancelable task was canceled before its result was used.
    ///
    /// Never a user-facing failure; callers drop it silently.
    #[error("task canceled")]
    Canceled,
}

impl AssistError {
    /// Whether this is the cancellation sentinel rather than a real failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, AssistError::Canceled)
    }
}

impl From<serde_json::Error> for AssistError {
    fn from(err: serde_json::Error) -> Self {
        AssistError::Json(err.to_string())
    }
}

impl From<reqwest::Error> for AssistError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AssistError::Json(err.to_string())
        } else {
            AssistError::Http(err.to_string())
        }
    }
}

/// Result type alias for promql-assist operations
pub type Result<T> = std::result::Result<T, AssistError>;
