//! Shared error response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structured error returned by every mutation instead of a raised exception.
///
/// Carries the error kind for programmatic dispatch, a stable numeric code
/// and a human-readable message. Upstream provider failures reuse the
/// provider's own numeric code (e.g. Twilio 20404).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error kind for client identification (see [`error_kinds`])
    pub error: String,

    /// Stable numeric error code
    pub code: i64,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (remaining seconds, field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Error kinds used across the application
pub mod error_kinds {
    pub const VALIDATION: &str = "VALIDATION";
    pub const THROTTLED: &str = "THROTTLED";
    pub const CONFLICT: &str = "CONFLICT";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const PERMISSION: &str = "PERMISSION";
    pub const UPSTREAM: &str = "UPSTREAM";
    pub const STORE: &str = "STORE";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}
