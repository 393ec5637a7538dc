use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::aggregate::{
    count_by_sla, count_by_state, densify_daily, group_by, BucketCount, DerivedAggregate, Grouping,
    CHART_STATE_BUCKETS,
};
use crate::chart::{
    sla_totals_series, sla_trend_series, state_count_series, state_share_series, ChartSeries,
};
use crate::config::DashboardConfig;
use crate::domain::Incident;
use crate::error::AppError;
use crate::filter::{filter_by_window, window_label, window_span};
use crate::metrics::{
    compute_summary_metrics, narrow_to_card, status_cards, StatusCard, SummaryMetrics,
};
use crate::normalize::{aggregate_percentages, PercentGroup};
use crate::table::{build_table_page, TablePage, TableQuery};
use crate::view::ViewState;

pub const DASHBOARD_PAYLOAD_VERSION: u32 = 1;

/// Everything a page needs to render one view, derived from scratch on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardPayload {
    pub version: u32,
    pub window_label: String,
    /// User-facing prompt when the selected window cannot be applied yet.
    pub prompt: Option<AppError>,
    pub incident_count: i64,
    pub filtered_count: i64,
    pub status_cards: Vec<StatusCard>,
    pub summary: SummaryMetrics,
    pub state_counts: Vec<BucketCount>,
    pub sla_counts: Vec<BucketCount>,
    pub sla_totals: ChartSeries,
    pub sla_trend: ChartSeries,
    pub sla_by_month: ChartSeries,
    pub category_state_percentages: Vec<PercentGroup>,
    pub category_state_chart: ChartSeries,
    pub priority_state: DerivedAggregate,
    pub priority_state_chart: ChartSeries,
    pub table: TablePage,
}

/// Inclusive day count of `[from, to]`.
fn span_days(from: Date, to: Date) -> i64 {
    (to - from).whole_days() + 1
}

/// Run the whole pipeline for one view: filter, aggregate, normalize, project.
///
/// An unusable custom window is not fatal: the view renders empty with `prompt` set.
pub fn build_dashboard(
    incidents: &[Incident],
    view: &ViewState,
    config: &DashboardConfig,
    now: OffsetDateTime,
) -> Result<DashboardPayload, AppError> {
    let offset = now.offset();
    let scope = config.all_filter_scope;
    let thresholds = config.thresholds();

    let (filtered, prompt) = match filter_by_window(incidents, &view.window, now, scope) {
        Ok(filtered) => (filtered, None),
        Err(e) if e.is_user_prompt() => (Vec::new(), Some(e)),
        Err(e) => return Err(e),
    };

    let daily = group_by(&filtered, &Grouping::DateBySla, offset);
    let daily = match window_span(&view.window, now, scope, &filtered) {
        Ok(Some((from, to))) if span_days(from, to) <= i64::from(config.max_trend_days) => {
            densify_daily(&daily, from, to)
        }
        Ok(Some((from, to))) => {
            warn!(
                %from,
                %to,
                max_trend_days = config.max_trend_days,
                "window too wide for a dense trend; keeping populated days only"
            );
            daily
        }
        Ok(None) | Err(_) => daily,
    };
    let monthly = group_by(&filtered, &Grouping::MonthBySla, offset);

    let by_category = group_by(&filtered, &Grouping::category_by_chart_states(), offset);
    let category_state_percentages = aggregate_percentages(&by_category);
    let priority_state = group_by(&filtered, &Grouping::priority_by_chart_states(), offset);

    let sla_counts = count_by_sla(&filtered);

    let table_base = match view.card {
        Some(card) => narrow_to_card(incidents, &filtered, card, now, &thresholds),
        None => filtered.clone(),
    };
    let table = build_table_page(
        &table_base,
        &TableQuery {
            search: &view.search,
            sort: view.sort,
            page: view.page,
            page_size: view.page_size,
        },
        offset,
    );
    debug!(
        card = ?view.card,
        table_rows = table.total_rows,
        "table view derived"
    );

    let payload = DashboardPayload {
        version: DASHBOARD_PAYLOAD_VERSION,
        window_label: window_label(&view.window, now),
        prompt,
        incident_count: incidents.len() as i64,
        filtered_count: filtered.len() as i64,
        status_cards: status_cards(&filtered),
        summary: compute_summary_metrics(incidents, now, &thresholds),
        state_counts: count_by_state(&filtered),
        sla_totals: sla_totals_series("Incidents SLA Performance", &sla_counts),
        sla_counts,
        sla_trend: sla_trend_series("SLA Trends", &daily),
        sla_by_month: sla_trend_series("SLA by Month", &monthly),
        category_state_chart: state_share_series(
            "Incident Categories",
            &category_state_percentages,
            &CHART_STATE_BUCKETS,
        ),
        category_state_percentages,
        priority_state_chart: state_count_series(
            "Incident Grouped (Priority Status)",
            &priority_state,
            &CHART_STATE_BUCKETS,
        ),
        priority_state,
        table,
    };

    info!(
        window = ?view.window,
        incidents = payload.incident_count,
        filtered = payload.filtered_count,
        prompt = payload.prompt.is_some(),
        "dashboard built"
    );
    Ok(payload)
}
