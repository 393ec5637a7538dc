use std::path::Path;

use itsm_core::analytics::{build_dashboard, DashboardPayload};
use itsm_core::config::DashboardConfig;
use itsm_core::domain::Incident;
use itsm_core::error::{codes, AppError};
use itsm_core::source::{IncidentQuery, IncidentSource};
use itsm_core::validate::{validate_batch, IncidentValidationReportItem};
use itsm_core::view::ViewState;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Session state the rendering layer talks to: config plus an immutable incident snapshot.
pub struct DashboardHost {
    config: DashboardConfig,
    incidents: Vec<Incident>,
}

impl DashboardHost {
    /// Fetch the session snapshot once; every later call re-derives from it.
    pub fn start(config: DashboardConfig, source: &dyn IncidentSource) -> Result<Self, AppError> {
        let incidents = source.fetch_incidents(&IncidentQuery {
            limit: Some(config.demo_incident_count),
        })?;

        let report = validate_batch(&incidents);
        if !report.is_empty() {
            warn!(flagged = report.len(), "incident snapshot has validation warnings");
        }
        info!(incidents = incidents.len(), "dashboard session started");
        Ok(Self { config, incidents })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn initial_view(&self) -> ViewState {
        ViewState::new(&self.config)
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn get_dashboard(
        &self,
        view: &ViewState,
        now: OffsetDateTime,
    ) -> Result<DashboardPayload, AppError> {
        build_dashboard(&self.incidents, view, &self.config, now)
    }

    pub fn validate(&self) -> Vec<IncidentValidationReportItem> {
        validate_batch(&self.incidents)
    }
}

/// Config from `path` when given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig, AppError> {
    match path {
        Some(p) => DashboardConfig::load(p),
        None => Ok(DashboardConfig::default()),
    }
}

/// Pretty JSON for stdout.
pub fn render_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        AppError::new(codes::OUTPUT_SERIALIZE_FAILED, "Failed to serialize dashboard payload")
            .with_details(e.to_string())
    })
}

/// Local time when the platform can tell us the offset, UTC otherwise.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|e| {
        warn!(err = %e, "local offset unavailable; using UTC");
        OffsetDateTime::now_utc()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use itsm_core::demo::DemoIncidentSource;
    use std::collections::HashMap;
    use time::macros::datetime;

    #[test]
    fn host_serves_dashboards_from_one_snapshot() {
        let now = datetime!(2024-11-14 12:00 UTC);
        let cfg = DashboardConfig {
            demo_incident_count: 30,
            ..DashboardConfig::default()
        };
        let source = DemoIncidentSource::new(cfg.clone()).at(now);
        let host = DashboardHost::start(cfg, &source).expect("start");
        assert_eq!(host.incidents().len(), 30);
        assert!(host.validate().is_empty());

        let view = host.initial_view();
        let first = host.get_dashboard(&view, now).expect("dash");
        let second = host.get_dashboard(&view, now).expect("dash");
        assert_eq!(first, second);

        let json = render_json(&first).expect("json");
        assert!(json.contains("\"window_label\""));
    }

    #[test]
    fn unserializable_output_is_a_structured_error() {
        let mut by_pair = HashMap::new();
        by_pair.insert((1, 2), 3);

        let err = render_json(&by_pair).expect_err("non-string map keys");
        assert_eq!(err.code, codes::OUTPUT_SERIALIZE_FAILED);
        assert!(err.details.is_some());
    }
}
