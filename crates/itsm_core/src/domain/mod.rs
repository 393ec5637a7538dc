use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Workflow state of an incident. The member set is the union of every dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncidentState {
    Open,
    InProgress,
    OnHold,
    Resolved,
    Closed,
    Unassigned,
}

impl IncidentState {
    pub const ALL: [IncidentState; 6] = [
        IncidentState::Open,
        IncidentState::InProgress,
        IncidentState::OnHold,
        IncidentState::Resolved,
        IncidentState::Closed,
        IncidentState::Unassigned,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IncidentState::Open => "Open",
            IncidentState::InProgress => "In Progress",
            IncidentState::OnHold => "On Hold",
            IncidentState::Resolved => "Resolved",
            IncidentState::Closed => "Closed",
            IncidentState::Unassigned => "Unassigned",
        }
    }

    /// Resolved and Closed incidents no longer count towards overdue/stale work.
    pub fn is_terminal(self) -> bool {
        matches!(self, IncidentState::Resolved | IncidentState::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Database,
    Hardware,
    Inquiry,
    Network,
    Software,
    Null,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Database,
        Category::Hardware,
        Category::Inquiry,
        Category::Network,
        Category::Software,
        Category::Null,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Database => "Database",
            Category::Hardware => "Hardware",
            Category::Inquiry => "Inquiry",
            Category::Network => "Network",
            Category::Software => "Software",
            Category::Null => "Null",
        }
    }
}

/// Priority, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Moderate,
    Low,
    Planning,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Critical,
        Priority::High,
        Priority::Moderate,
        Priority::Low,
        Priority::Planning,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Moderate => "Moderate",
            Priority::Low => "Low",
            Priority::Planning => "Planning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlaOutcome {
    Met,
    NotMet,
}

impl SlaOutcome {
    pub const ALL: [SlaOutcome; 2] = [SlaOutcome::Met, SlaOutcome::NotMet];

    pub fn label(self) -> &'static str {
        match self {
            SlaOutcome::Met => "Met",
            SlaOutcome::NotMet => "Not Met",
        }
    }
}

impl fmt::Display for IncidentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SlaOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One IT service ticket in the read-only dashboard snapshot.
///
/// Notes:
/// - Timestamps serialize as RFC3339 and keep the offset they were created with; calendar
///   comparisons (today, month, year) are made in the offset of the caller's `now`.
/// - `last_updated_at >= opened_at` holds for generated records; other sources are checked by
///   `validate::validate_incident`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    pub number: String,
    pub state: IncidentState,
    pub category: Category,
    pub priority: Priority,
    pub sla_outcome: SlaOutcome,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub opened_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated_at: OffsetDateTime,
    pub short_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
