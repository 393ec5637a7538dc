use rand::Rng;
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::config::{DashboardConfig, OpenedAtPolicy};
use crate::domain::{Category, Incident, IncidentState, Priority, SlaOutcome};
use crate::error::AppError;
use crate::source::{IncidentQuery, IncidentSource};
use crate::validate::NUMBER_PREFIX;

pub const SHORT_DESCRIPTIONS: [&str; 10] = [
    "Unable to log in to email",
    "VPN connection keeps dropping",
    "Printer on floor 3 offline",
    "Database query timing out",
    "Laptop will not boot",
    "Request for software license",
    "Shared drive not accessible",
    "Application crashes on startup",
    "Slow network in branch office",
    "Password reset request",
];

const MAX_UPDATE_LAG_DAYS: i64 = 14;

fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

/// Days before `now`: mostly within the last month, the rest 31-60 days back so every batch
/// has both recent and overdue work.
fn age_days<R: Rng + ?Sized>(rng: &mut R, recent_share: f64) -> i64 {
    if rng.gen::<f64>() < recent_share {
        rng.gen_range(0..30)
    } else {
        rng.gen_range(31..61)
    }
}

fn open_time<R: Rng + ?Sized>(
    rng: &mut R,
    created_at: OffsetDateTime,
    now: OffsetDateTime,
    config: &DashboardConfig,
) -> OffsetDateTime {
    match config.opened_at_policy {
        OpenedAtPolicy::SameAsCreated => created_at,
        OpenedAtPolicy::LagsCreated => {
            let lag = rng.gen_range(0..=i64::from(config.max_open_lag_hours) * 60);
            (created_at + Duration::minutes(lag)).min(now).max(created_at)
        }
    }
}

/// Build `count` synthetic incidents relative to `now`.
///
/// Only the structure is guaranteed (unique `INC` numbers, enumerated fields, age
/// distribution, `last_updated_at >= opened_at`); values differ per call.
pub fn generate_incidents<R: Rng + ?Sized>(
    count: usize,
    now: OffsetDateTime,
    config: &DashboardConfig,
    rng: &mut R,
) -> Vec<Incident> {
    let mut out = Vec::with_capacity(count);
    for i in 1..=count {
        let created_at = now - Duration::days(age_days(rng, config.recent_share));
        let opened_at = open_time(rng, created_at, now, config);
        let update_lag = Duration::minutes(rng.gen_range(0..=MAX_UPDATE_LAG_DAYS * 24 * 60));
        let last_updated_at = (opened_at + update_lag).min(now).max(opened_at);

        out.push(Incident {
            number: format!("{NUMBER_PREFIX}{i:07}"),
            state: pick(rng, &IncidentState::ALL),
            category: pick(rng, &Category::ALL),
            priority: pick(rng, &Priority::ALL),
            sla_outcome: pick(rng, &SlaOutcome::ALL),
            created_at,
            opened_at,
            last_updated_at,
            short_description: pick(rng, &SHORT_DESCRIPTIONS).to_string(),
        });
    }
    out
}

/// Generate with the thread RNG against the current UTC time.
pub fn generate(count: usize, config: &DashboardConfig) -> Vec<Incident> {
    generate_incidents(count, OffsetDateTime::now_utc(), config, &mut rand::thread_rng())
}

/// `IncidentSource` backed by the generator.
#[derive(Debug, Clone)]
pub struct DemoIncidentSource {
    config: DashboardConfig,
    now: Option<OffsetDateTime>,
}

impl DemoIncidentSource {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config, now: None }
    }

    /// Pin the reference time instead of reading the clock on every fetch.
    pub fn at(mut self, now: OffsetDateTime) -> Self {
        self.now = Some(now);
        self
    }
}

impl IncidentSource for DemoIncidentSource {
    fn fetch_incidents(&self, query: &IncidentQuery) -> Result<Vec<Incident>, AppError> {
        let count = query.limit.unwrap_or(self.config.demo_incident_count);
        let now = self.now.unwrap_or_else(OffsetDateTime::now_utc);
        let incidents = generate_incidents(count, now, &self.config, &mut rand::thread_rng());
        info!(count = incidents.len(), %now, "generated demo incidents");
        Ok(incidents)
    }
}
