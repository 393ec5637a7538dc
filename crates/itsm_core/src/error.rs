use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes surfaced to the presentation layer.
pub mod codes {
    pub const FILTER_CUSTOM_RANGE_INCOMPLETE: &str = "FILTER_CUSTOM_RANGE_INCOMPLETE";
    pub const FILTER_CUSTOM_RANGE_INVERTED: &str = "FILTER_CUSTOM_RANGE_INVERTED";
    pub const FILTER_DATE_UNPARSEABLE: &str = "FILTER_DATE_UNPARSEABLE";
    pub const VIEW_PAGE_SIZE_INVALID: &str = "VIEW_PAGE_SIZE_INVALID";
    pub const CONFIG_READ_FAILED: &str = "CONFIG_READ_FAILED";
    pub const CONFIG_PARSE_FAILED: &str = "CONFIG_PARSE_FAILED";
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
    pub const SOURCE_FETCH_FAILED: &str = "SOURCE_FETCH_FAILED";
    pub const OUTPUT_SERIALIZE_FAILED: &str = "OUTPUT_SERIALIZE_FAILED";
}

/// Structured error shared by every pipeline stage and the host.
///
/// Nothing in the pipeline performs I/O, so `retryable` is only ever set by
/// incident sources that talk to something external.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// True for errors the user resolves by correcting their filter input.
    pub fn is_user_prompt(&self) -> bool {
        matches!(
            self.code.as_str(),
            codes::FILTER_CUSTOM_RANGE_INCOMPLETE
                | codes::FILTER_CUSTOM_RANGE_INVERTED
                | codes::FILTER_DATE_UNPARSEABLE
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
