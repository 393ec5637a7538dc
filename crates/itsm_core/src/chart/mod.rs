use serde::{Deserialize, Serialize};

use crate::aggregate::{BucketCount, DerivedAggregate};
use crate::domain::{IncidentState, SlaOutcome};
use crate::normalize::PercentGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartUnit {
    Count,
    Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<i64>,
    pub color: String,
}

/// Labels plus datasets aligned by label index, ready for a charting widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartSeries {
    pub title: String,
    pub unit: ChartUnit,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartSeries {
    pub fn dataset(&self, label: &str) -> Option<&ChartDataset> {
        self.datasets.iter().find(|d| d.label == label)
    }
}

pub fn sla_color(outcome: SlaOutcome) -> &'static str {
    match outcome {
        SlaOutcome::Met => "#2ecc71",
        SlaOutcome::NotMet => "#e74c3c",
    }
}

pub fn state_color(state: IncidentState) -> &'static str {
    match state {
        IncidentState::Open => "#3498db",
        IncidentState::InProgress => "#1abc9c",
        IncidentState::OnHold => "#9c27b0",
        IncidentState::Resolved => "#4caf50",
        IncidentState::Closed => "#607d8b",
        IncidentState::Unassigned => "#f39c12",
    }
}

fn sla_dataset_label(outcome: SlaOutcome) -> String {
    format!("SLA {}", outcome.label())
}

/// Line series of SLA Met / Not Met per date (or month) group.
pub fn sla_trend_series(title: &str, aggregate: &DerivedAggregate) -> ChartSeries {
    let labels = aggregate.groups.iter().map(|g| g.key.clone()).collect();
    let datasets = SlaOutcome::ALL
        .iter()
        .map(|outcome| ChartDataset {
            label: sla_dataset_label(*outcome),
            data: aggregate
                .groups
                .iter()
                .map(|g| g.count_of(outcome.label()))
                .collect(),
            color: sla_color(*outcome).to_string(),
        })
        .collect();

    ChartSeries {
        title: title.to_string(),
        unit: ChartUnit::Count,
        labels,
        datasets,
    }
}

/// Stacked percentage series: one dataset per state bucket, one label per group.
pub fn state_share_series(
    title: &str,
    groups: &[PercentGroup],
    buckets: &[IncidentState],
) -> ChartSeries {
    let labels = groups.iter().map(|g| g.key.clone()).collect();
    let datasets = buckets
        .iter()
        .map(|state| ChartDataset {
            label: state.label().to_string(),
            data: groups
                .iter()
                .map(|g| {
                    g.percents
                        .iter()
                        .find(|p| p.label == state.label())
                        .map(|p| p.percent)
                        .unwrap_or(0)
                })
                .collect(),
            color: state_color(*state).to_string(),
        })
        .collect();

    ChartSeries {
        title: title.to_string(),
        unit: ChartUnit::Percent,
        labels,
        datasets,
    }
}

/// Grouped count series: one dataset per state bucket, one label per group.
pub fn state_count_series(
    title: &str,
    aggregate: &DerivedAggregate,
    buckets: &[IncidentState],
) -> ChartSeries {
    let labels = aggregate.groups.iter().map(|g| g.key.clone()).collect();
    let datasets = buckets
        .iter()
        .map(|state| ChartDataset {
            label: state.label().to_string(),
            data: aggregate
                .groups
                .iter()
                .map(|g| g.count_of(state.label()))
                .collect(),
            color: state_color(*state).to_string(),
        })
        .collect();

    ChartSeries {
        title: title.to_string(),
        unit: ChartUnit::Count,
        labels,
        datasets,
    }
}

/// Two-bar SLA summary from flat SLA counts.
pub fn sla_totals_series(title: &str, counts: &[BucketCount]) -> ChartSeries {
    let datasets = SlaOutcome::ALL
        .iter()
        .map(|outcome| ChartDataset {
            label: sla_dataset_label(*outcome),
            data: vec![counts
                .iter()
                .find(|c| c.label == outcome.label())
                .map(|c| c.count)
                .unwrap_or(0)],
            color: sla_color(*outcome).to_string(),
        })
        .collect();

    ChartSeries {
        title: title.to_string(),
        unit: ChartUnit::Count,
        labels: vec!["SLA".to_string()],
        datasets,
    }
}
