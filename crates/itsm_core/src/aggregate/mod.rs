use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, UtcOffset};

use crate::domain::{Category, Incident, IncidentState, Priority, SlaOutcome};
use crate::normalize::timestamps::{iso_date_key, local_date, month_key};

/// State buckets used by the category and priority charts. Incidents in other states are
/// not counted there.
pub const CHART_STATE_BUCKETS: [IncidentState; 4] = [
    IncidentState::Open,
    IncidentState::InProgress,
    IncidentState::Closed,
    IncidentState::Unassigned,
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketCount {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregateGroup {
    pub key: String,
    pub counts: Vec<BucketCount>,
}

impl AggregateGroup {
    pub fn total(&self) -> i64 {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn count_of(&self, label: &str) -> i64 {
        self.counts
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Date,
    Month,
    Category,
    Priority,
}

/// Grouping result: one group per dimension value, each with counts per sub-bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DerivedAggregate {
    pub dimension: Dimension,
    pub bucket_labels: Vec<String>,
    pub groups: Vec<AggregateGroup>,
}

impl DerivedAggregate {
    pub fn group(&self, key: &str) -> Option<&AggregateGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.key.as_str()).collect()
    }
}

/// Supported dimension/sub-dimension pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    DateBySla,
    MonthBySla,
    CategoryByState(Vec<IncidentState>),
    PriorityByState(Vec<IncidentState>),
}

impl Grouping {
    pub fn category_by_chart_states() -> Self {
        Grouping::CategoryByState(CHART_STATE_BUCKETS.to_vec())
    }

    pub fn priority_by_chart_states() -> Self {
        Grouping::PriorityByState(CHART_STATE_BUCKETS.to_vec())
    }
}

fn sla_labels() -> Vec<String> {
    SlaOutcome::ALL.iter().map(|s| s.label().to_string()).collect()
}

fn state_labels(buckets: &[IncidentState]) -> Vec<String> {
    buckets.iter().map(|s| s.label().to_string()).collect()
}

fn zeroed(labels: &[String]) -> Vec<BucketCount> {
    labels
        .iter()
        .map(|l| BucketCount {
            label: l.clone(),
            count: 0,
        })
        .collect()
}

fn bump(counts: &mut [BucketCount], label: &str) {
    if let Some(c) = counts.iter_mut().find(|c| c.label == label) {
        c.count += 1;
    }
}

/// Date keyed grouping; keys appear only for days/months that have incidents, ascending.
fn group_by_time_key(
    incidents: &[Incident],
    dimension: Dimension,
    offset: UtcOffset,
    key_of: impl Fn(Date) -> String,
) -> DerivedAggregate {
    let labels = sla_labels();
    let mut map: BTreeMap<String, Vec<BucketCount>> = BTreeMap::new();
    for inc in incidents {
        let key = key_of(local_date(inc.created_at, offset));
        let counts = map.entry(key).or_insert_with(|| zeroed(&labels));
        bump(counts, inc.sla_outcome.label());
    }

    DerivedAggregate {
        dimension,
        bucket_labels: labels,
        groups: map
            .into_iter()
            .map(|(key, counts)| AggregateGroup { key, counts })
            .collect(),
    }
}

/// Canonically keyed grouping; every canonical key is present, zero filled, in canonical
/// order. States outside `buckets` are skipped.
fn group_by_canonical<K: Copy + PartialEq>(
    incidents: &[Incident],
    dimension: Dimension,
    canonical: &[K],
    key_label: impl Fn(K) -> &'static str,
    key_of: impl Fn(&Incident) -> K,
    buckets: &[IncidentState],
) -> DerivedAggregate {
    let labels = state_labels(buckets);
    let mut groups = canonical
        .iter()
        .map(|k| AggregateGroup {
            key: key_label(*k).to_string(),
            counts: zeroed(&labels),
        })
        .collect::<Vec<_>>();

    for inc in incidents {
        if !buckets.contains(&inc.state) {
            continue;
        }
        let key = key_of(inc);
        if let Some(idx) = canonical.iter().position(|k| *k == key) {
            bump(&mut groups[idx].counts, inc.state.label());
        }
    }

    DerivedAggregate {
        dimension,
        bucket_labels: labels,
        groups,
    }
}

/// Group incidents by one dimension and count per sub-dimension value.
///
/// Date and month keys use the calendar of `offset` (the caller's local offset).
pub fn group_by(
    incidents: &[Incident],
    grouping: &Grouping,
    offset: UtcOffset,
) -> DerivedAggregate {
    match grouping {
        Grouping::DateBySla => group_by_time_key(incidents, Dimension::Date, offset, iso_date_key),
        Grouping::MonthBySla => group_by_time_key(incidents, Dimension::Month, offset, month_key),
        Grouping::CategoryByState(buckets) => group_by_canonical(
            incidents,
            Dimension::Category,
            &Category::ALL,
            Category::label,
            |inc| inc.category,
            buckets,
        ),
        Grouping::PriorityByState(buckets) => group_by_canonical(
            incidents,
            Dimension::Priority,
            &Priority::ALL,
            Priority::label,
            |inc| inc.priority,
            buckets,
        ),
    }
}

/// Expand a date-keyed aggregate to one group per day in `[from, to]`, zero filling gaps.
/// Groups outside the span are dropped.
pub fn densify_daily(aggregate: &DerivedAggregate, from: Date, to: Date) -> DerivedAggregate {
    let mut groups = Vec::new();
    let mut next = Some(from);
    while let Some(day) = next.filter(|d| *d <= to) {
        let key = iso_date_key(day);
        let counts = aggregate
            .group(&key)
            .map(|g| g.counts.clone())
            .unwrap_or_else(|| zeroed(&aggregate.bucket_labels));
        groups.push(AggregateGroup { key, counts });
        // `None` past `Date::MAX`.
        next = day.next_day();
    }

    DerivedAggregate {
        dimension: Dimension::Date,
        bucket_labels: aggregate.bucket_labels.clone(),
        groups,
    }
}

/// Count per state over the full state enumeration, canonical order.
pub fn count_by_state(incidents: &[Incident]) -> Vec<BucketCount> {
    IncidentState::ALL
        .iter()
        .map(|s| BucketCount {
            label: s.label().to_string(),
            count: incidents.iter().filter(|inc| inc.state == *s).count() as i64,
        })
        .collect()
}

/// Count per SLA outcome, canonical order.
pub fn count_by_sla(incidents: &[Incident]) -> Vec<BucketCount> {
    SlaOutcome::ALL
        .iter()
        .map(|s| BucketCount {
            label: s.label().to_string(),
            count: incidents.iter().filter(|inc| inc.sla_outcome == *s).count() as i64,
        })
        .collect()
}
