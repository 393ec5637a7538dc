use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Incident;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IncidentQuery {
    /// Upper bound on returned incidents; `None` lets the source decide.
    pub limit: Option<usize>,
}

/// Anything that can hand the dashboard a snapshot of incidents.
///
/// Aggregation code only sees the returned `Vec<Incident>`, so the demo generator and a real
/// backend are interchangeable.
pub trait IncidentSource {
    fn fetch_incidents(&self, query: &IncidentQuery) -> Result<Vec<Incident>, AppError>;
}

/// Fixed snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIncidentSource {
    incidents: Vec<Incident>,
}

impl InMemoryIncidentSource {
    pub fn new(incidents: Vec<Incident>) -> Self {
        Self { incidents }
    }
}

impl IncidentSource for InMemoryIncidentSource {
    fn fetch_incidents(&self, query: &IncidentQuery) -> Result<Vec<Incident>, AppError> {
        let limit = query.limit.unwrap_or(self.incidents.len());
        let out = self.incidents.iter().take(limit).cloned().collect::<Vec<_>>();
        debug!(
            available = self.incidents.len(),
            returned = out.len(),
            "served in-memory incidents"
        );
        Ok(out)
    }
}
