pub mod aggregate;
pub mod analytics;
pub mod chart;
pub mod config;
pub mod demo;
pub mod domain;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod normalize;
pub mod source;
pub mod table;
pub mod validate;
pub mod view;

#[cfg(test)]
mod tests {
    use super::error::{codes, AppError};

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new(codes::CONFIG_INVALID, "bad config").with_retryable(false);
        assert_eq!(err.code, "CONFIG_INVALID");
        assert_eq!(err.message, "bad config");
        assert!(!err.retryable);
        assert_eq!(err.to_string(), "[CONFIG_INVALID] bad config");
    }

    #[test]
    fn only_filter_input_errors_are_prompts() {
        assert!(AppError::new(codes::FILTER_CUSTOM_RANGE_INCOMPLETE, "x").is_user_prompt());
        assert!(!AppError::new(codes::SOURCE_FETCH_FAILED, "x").is_user_prompt());
    }
}
