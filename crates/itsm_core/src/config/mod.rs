use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{codes, AppError};

/// What the `All` window covers. Dashboard pages disagreed on this, so it is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AllFilterScope {
    Unrestricted,
    #[default]
    CurrentYear,
}

/// How the generator derives `opened_at` from `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OpenedAtPolicy {
    SameAsCreated,
    /// `opened_at` trails `created_at` by up to `max_open_lag_hours`, never past `now`.
    #[default]
    LagsCreated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub all_filter_scope: AllFilterScope,
    pub opened_at_policy: OpenedAtPolicy,
    pub max_open_lag_hours: u32,
    pub overdue_days: u32,
    pub stale_days: u32,
    pub page_size_options: Vec<usize>,
    pub default_page_size: usize,
    pub demo_incident_count: usize,
    /// Widest span, in days, the daily SLA trend is zero filled over; wider windows keep only
    /// the days that have incidents.
    pub max_trend_days: u32,
    /// Probability that a generated incident is 0-29 days old rather than 31-60.
    pub recent_share: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            all_filter_scope: AllFilterScope::default(),
            opened_at_policy: OpenedAtPolicy::default(),
            max_open_lag_hours: 4,
            overdue_days: 30,
            stale_days: 7,
            page_size_options: vec![5, 10, 15],
            default_page_size: 10,
            demo_incident_count: 100,
            max_trend_days: 731,
            recent_share: 0.8,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(text: &str) -> Result<Self, AppError> {
        let cfg: DashboardConfig = serde_json::from_str(text).map_err(|e| {
            AppError::new(codes::CONFIG_PARSE_FAILED, "Failed to parse dashboard config")
                .with_details(e.to_string())
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|e| {
            AppError::new(codes::CONFIG_READ_FAILED, "Failed to read dashboard config")
                .with_details(format!("path={}; err={e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let invalid = |details: String| -> Result<(), AppError> {
            Err(AppError::new(codes::CONFIG_INVALID, "Invalid dashboard config")
                .with_details(details))
        };

        if self.overdue_days == 0 || self.stale_days == 0 {
            return invalid(format!(
                "overdue_days={}; stale_days={}; both must be > 0",
                self.overdue_days, self.stale_days
            ));
        }
        if self.page_size_options.is_empty() || self.page_size_options.contains(&0) {
            return invalid(format!(
                "page_size_options={:?}; must be non-empty and > 0",
                self.page_size_options
            ));
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return invalid(format!(
                "default_page_size={} not in page_size_options={:?}",
                self.default_page_size, self.page_size_options
            ));
        }
        if self.max_trend_days == 0 {
            return invalid("max_trend_days must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.recent_share) {
            return invalid(format!("recent_share={} outside [0, 1]", self.recent_share));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> crate::metrics::MetricThresholds {
        crate::metrics::MetricThresholds {
            overdue_days: self.overdue_days,
            stale_days: self.stale_days,
        }
    }
}
