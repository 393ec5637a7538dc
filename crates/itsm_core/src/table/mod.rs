use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::domain::Incident;
use crate::normalize::timestamps::{iso_date_key, local_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Number,
    Opened,
    ShortDescription,
    Priority,
    State,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Stringified incident as shown in the incidents table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableRow {
    pub number: String,
    pub opened: String,
    pub short_description: String,
    pub priority: String,
    pub state: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TablePage {
    pub rows: Vec<TableRow>,
    pub total_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub sort: SortConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery<'a> {
    pub search: &'a str,
    pub sort: SortConfig,
    pub page: usize,
    pub page_size: usize,
}

pub fn to_row(incident: &Incident, offset: UtcOffset) -> TableRow {
    TableRow {
        number: incident.number.clone(),
        opened: iso_date_key(local_date(incident.opened_at, offset)),
        short_description: incident.short_description.clone(),
        priority: incident.priority.label().to_string(),
        state: incident.state.label().to_string(),
        category: incident.category.label().to_string(),
    }
}

/// Case-insensitive substring match against every stringified field. Blank matches all.
pub fn row_matches(row: &TableRow, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        &row.number,
        &row.opened,
        &row.short_description,
        &row.priority,
        &row.state,
        &row.category,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

fn compare(a: &Incident, b: &Incident, key: SortKey) -> Ordering {
    match key {
        SortKey::Number => a.number.cmp(&b.number),
        SortKey::Opened => a.opened_at.cmp(&b.opened_at),
        SortKey::ShortDescription => a.short_description.cmp(&b.short_description),
        SortKey::Priority => a.priority.cmp(&b.priority),
        SortKey::State => a.state.label().cmp(b.state.label()),
        SortKey::Category => a.category.label().cmp(b.category.label()),
    }
}

/// Search, sort (stable) and slice one page of incidents into table rows.
///
/// Priority sorts by urgency (Critical first when ascending); text columns sort by label.
/// A page past the end yields no rows.
pub fn build_table_page(
    incidents: &[Incident],
    query: &TableQuery<'_>,
    offset: UtcOffset,
) -> TablePage {
    let mut matching = incidents
        .iter()
        .filter(|inc| row_matches(&to_row(inc, offset), query.search))
        .collect::<Vec<_>>();

    matching.sort_by(|a, b| {
        let ord = compare(a, b, query.sort.key);
        match query.sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    let total_rows = matching.len();
    let page_size = query.page_size.max(1);
    let page_count = total_rows.div_ceil(page_size);
    let rows = matching
        .into_iter()
        .skip(query.page.saturating_mul(page_size))
        .take(page_size)
        .map(|inc| to_row(inc, offset))
        .collect();

    TablePage {
        rows,
        total_rows,
        page: query.page,
        page_size,
        page_count,
        sort: query.sort,
    }
}
