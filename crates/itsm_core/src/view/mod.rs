use serde::{Deserialize, Serialize};
use time::Date;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::{codes, AppError};
use crate::filter::{resolve_custom_range, DateWindow};
use crate::metrics::SummaryCard;
use crate::table::{SortConfig, SortDirection, SortKey};

/// Everything the user has selected on a dashboard page.
///
/// Values are never mutated in place: each action returns the next state, so a host can keep
/// history or compare states cheaply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub window: DateWindow,
    pub sort: SortConfig,
    pub search: String,
    pub page: usize,
    pub page_size: usize,
    pub card: Option<SummaryCard>,
}

impl ViewState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            window: DateWindow::All,
            sort: SortConfig::default(),
            search: String::new(),
            page: 0,
            page_size: config.default_page_size,
            card: None,
        }
    }

    pub fn with_window(&self, window: DateWindow) -> Self {
        Self {
            window,
            page: 0,
            ..self.clone()
        }
    }

    /// Switch to a custom window. An incomplete or inverted range leaves the view as it is and
    /// returns the prompt to show the user.
    pub fn apply_custom_range(
        &self,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Self, AppError> {
        let (from, to) = resolve_custom_range(from, to).inspect_err(|e| {
            debug!(code = %e.code, "custom range not applied");
        })?;
        Ok(self.with_window(DateWindow::custom(from, to)))
    }

    /// Clicking the active column flips direction; a new column starts ascending.
    pub fn toggle_sort(&self, key: SortKey) -> Self {
        let direction = if self.sort.key == key {
            self.sort.direction.flipped()
        } else {
            SortDirection::Asc
        };
        Self {
            sort: SortConfig { key, direction },
            ..self.clone()
        }
    }

    pub fn with_search(&self, text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            page: 0,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn with_page_size(
        &self,
        page_size: usize,
        config: &DashboardConfig,
    ) -> Result<Self, AppError> {
        if !config.page_size_options.contains(&page_size) {
            return Err(AppError::new(
                codes::VIEW_PAGE_SIZE_INVALID,
                "Unsupported rows-per-page value",
            )
            .with_details(format!(
                "page_size={page_size}; options={:?}",
                config.page_size_options
            )));
        }
        Ok(Self {
            page_size,
            page: 0,
            ..self.clone()
        })
    }

    /// Select a summary card, or clear the selection with `None`.
    pub fn with_card(&self, card: Option<SummaryCard>) -> Self {
        Self {
            card,
            page: 0,
            ..self.clone()
        }
    }
}
