use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::domain::{Incident, IncidentState};
use crate::normalize::timestamps::local_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricThresholds {
    pub overdue_days: u32,
    pub stale_days: u32,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            overdue_days: 30,
            stale_days: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub overdue: i64,
    pub stale: i64,
    pub unassigned: i64,
}

/// Created in `now`'s local calendar year.
pub fn in_current_year(incident: &Incident, now: OffsetDateTime) -> bool {
    local_date(incident.created_at, now.offset()).year() == now.year()
}

pub fn is_overdue(incident: &Incident, now: OffsetDateTime, thresholds: &MetricThresholds) -> bool {
    !incident.state.is_terminal()
        && incident.opened_at <= now - Duration::days(i64::from(thresholds.overdue_days))
}

pub fn is_stale(incident: &Incident, thresholds: &MetricThresholds) -> bool {
    !incident.state.is_terminal()
        && incident.last_updated_at - incident.opened_at
            > Duration::days(i64::from(thresholds.stale_days))
}

/// Year-scoped summary counters over the full snapshot, independent of the active window.
pub fn compute_summary_metrics(
    incidents: &[Incident],
    now: OffsetDateTime,
    thresholds: &MetricThresholds,
) -> SummaryMetrics {
    let mut out = SummaryMetrics {
        overdue: 0,
        stale: 0,
        unassigned: 0,
    };
    for inc in incidents.iter().filter(|inc| in_current_year(inc, now)) {
        if is_overdue(inc, now, thresholds) {
            out.overdue += 1;
        }
        if is_stale(inc, thresholds) {
            out.stale += 1;
        }
        if inc.state == IncidentState::Unassigned {
            out.unassigned += 1;
        }
    }
    out
}

/// A clickable summary card. Selecting one narrows the table to the matching incidents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "card", content = "state", rename_all = "snake_case")]
pub enum SummaryCard {
    Total,
    State(IncidentState),
    Overdue,
    Stale,
    Unassigned,
}

impl SummaryCard {
    /// Status cards count the filtered view; overdue/stale/unassigned count the current year.
    pub fn uses_window(self) -> bool {
        matches!(self, SummaryCard::Total | SummaryCard::State(_))
    }

    pub fn label(self) -> &'static str {
        match self {
            SummaryCard::Total => "Total",
            SummaryCard::State(s) => s.label(),
            SummaryCard::Overdue => "Overdue",
            SummaryCard::Stale => "Stale",
            SummaryCard::Unassigned => "Unassigned",
        }
    }

    pub fn matches(
        self,
        incident: &Incident,
        now: OffsetDateTime,
        thresholds: &MetricThresholds,
    ) -> bool {
        match self {
            SummaryCard::Total => true,
            SummaryCard::State(s) => incident.state == s,
            SummaryCard::Overdue => {
                in_current_year(incident, now) && is_overdue(incident, now, thresholds)
            }
            SummaryCard::Stale => in_current_year(incident, now) && is_stale(incident, thresholds),
            SummaryCard::Unassigned => {
                in_current_year(incident, now) && incident.state == IncidentState::Unassigned
            }
        }
    }
}

/// Narrow to the incidents behind a card, keeping order.
///
/// `filtered` is the window view and `all` the full snapshot; the card decides which applies.
pub fn narrow_to_card(
    all: &[Incident],
    filtered: &[Incident],
    card: SummaryCard,
    now: OffsetDateTime,
    thresholds: &MetricThresholds,
) -> Vec<Incident> {
    let base = if card.uses_window() { filtered } else { all };
    base.iter()
        .filter(|inc| card.matches(inc, now, thresholds))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCard {
    pub card: SummaryCard,
    pub label: String,
    pub count: i64,
    pub color: String,
}

const TOTAL_COLOR: &str = "#2196f3";
const STATUS_CARD_STATES: [IncidentState; 5] = [
    IncidentState::Open,
    IncidentState::InProgress,
    IncidentState::OnHold,
    IncidentState::Resolved,
    IncidentState::Closed,
];

/// Status card accent per state, separate from the chart palette (`chart::state_color`).
pub fn card_color(state: IncidentState) -> &'static str {
    match state {
        IncidentState::Open => "#f44336",
        IncidentState::InProgress => "#ff9800",
        IncidentState::OnHold => "#9c27b0",
        IncidentState::Resolved => "#4caf50",
        IncidentState::Closed => "#607d8b",
        IncidentState::Unassigned => "#f39c12",
    }
}

/// Total plus per-state counters over the filtered view.
pub fn status_cards(filtered: &[Incident]) -> Vec<StatusCard> {
    let mut cards = vec![StatusCard {
        card: SummaryCard::Total,
        label: SummaryCard::Total.label().to_string(),
        count: filtered.len() as i64,
        color: TOTAL_COLOR.to_string(),
    }];
    for state in STATUS_CARD_STATES {
        cards.push(StatusCard {
            card: SummaryCard::State(state),
            label: state.label().to_string(),
            count: filtered.iter().filter(|inc| inc.state == state).count() as i64,
            color: card_color(state).to_string(),
        });
    }
    cards
}
