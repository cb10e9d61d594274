//! REST API types
//!
//! Every endpoint answers with the same envelope:
//! `{success, data?, count?, source?, message?, error?, timestamp}`.
//! `timestamp` is always present in RFC 3339; the optional fields are
//! omitted when unset instead of serialized as null. On failures `error`
//! carries the stable machine code and `message` the human detail.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Current instant in the `2025-04-17T12:34:56.789Z` form the API uses
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Response envelope shared by every endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success_with_data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            source: None,
            message: None,
            error: None,
            timestamp: now_rfc3339(),
        }
    }

    pub fn failure(error: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            source: None,
            message: Some(message.to_string()),
            error: Some(error.to_string()),
            timestamp: now_rfc3339(),
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

/// Empty data type for responses without data
#[derive(Debug, Clone, Serialize)]
pub struct Empty {}

/// Query string for the history endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}
