use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use time::macros::datetime;

use itsm_core::config::{DashboardConfig, OpenedAtPolicy};
use itsm_core::demo::{generate, generate_incidents, DemoIncidentSource, SHORT_DESCRIPTIONS};
use itsm_core::source::{InMemoryIncidentSource, IncidentQuery, IncidentSource};
use itsm_core::validate::{is_well_formed_number, validate_batch};

#[test]
fn generated_numbers_are_unique_and_well_formed() {
    let incidents = generate(100, &DashboardConfig::default());
    assert_eq!(incidents.len(), 100);

    let unique: BTreeSet<&str> = incidents.iter().map(|i| i.number.as_str()).collect();
    assert_eq!(unique.len(), 100);
    assert!(incidents.iter().all(|i| is_well_formed_number(&i.number)));
    assert_eq!(incidents[0].number, "INC0000001");
    assert_eq!(incidents[99].number, "INC0000100");
}

#[test]
fn zero_count_yields_empty_batch() {
    assert!(generate(0, &DashboardConfig::default()).is_empty());
}

#[test]
fn ages_skip_day_30_and_stay_within_60_days() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let mut rng = StdRng::seed_from_u64(42);
    let incidents = generate_incidents(500, now, &DashboardConfig::default(), &mut rng);

    let mut recent = 0;
    for inc in &incidents {
        let age = (now - inc.created_at).whole_days();
        assert!((0..=60).contains(&age), "age={age}");
        assert_ne!(age, 30);
        if age < 30 {
            recent += 1;
        }
    }
    // ~80% recent; a wide band keeps this independent of the seed.
    assert!((300..=480).contains(&recent), "recent={recent}");
    assert!(recent < incidents.len(), "expected some overdue-aged incidents");
}

#[test]
fn timestamps_respect_ordering_and_now() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let mut rng = StdRng::seed_from_u64(7);
    let incidents = generate_incidents(200, now, &DashboardConfig::default(), &mut rng);

    for inc in &incidents {
        assert!(inc.opened_at >= inc.created_at);
        assert!(inc.opened_at <= now);
        assert!(inc.last_updated_at >= inc.opened_at);
        assert!(inc.last_updated_at <= now);
        assert!(SHORT_DESCRIPTIONS.contains(&inc.short_description.as_str()));
    }
    assert!(validate_batch(&incidents).is_empty());
}

#[test]
fn same_as_created_policy_pins_opened_at() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let cfg = DashboardConfig {
        opened_at_policy: OpenedAtPolicy::SameAsCreated,
        ..DashboardConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(3);
    let incidents = generate_incidents(50, now, &cfg, &mut rng);
    assert!(incidents.iter().all(|i| i.opened_at == i.created_at));
}

#[test]
fn sources_are_interchangeable_behind_the_trait() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let cfg = DashboardConfig {
        demo_incident_count: 25,
        ..DashboardConfig::default()
    };

    let demo = DemoIncidentSource::new(cfg).at(now);
    let from_demo = demo
        .fetch_incidents(&IncidentQuery::default())
        .expect("demo fetch");
    assert_eq!(from_demo.len(), 25);

    let snapshot = InMemoryIncidentSource::new(from_demo.clone());
    let sources: Vec<Box<dyn IncidentSource>> = vec![Box::new(demo), Box::new(snapshot)];
    for source in &sources {
        let limited = source
            .fetch_incidents(&IncidentQuery { limit: Some(10) })
            .expect("fetch");
        assert_eq!(limited.len(), 10);
    }
}

#[test]
fn validation_flags_duplicates_and_bad_ordering() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let mut rng = StdRng::seed_from_u64(11);
    let mut incidents = generate_incidents(3, now, &DashboardConfig::default(), &mut rng);
    incidents[1].number = incidents[0].number.clone();
    incidents[2].last_updated_at = incidents[2].opened_at - time::Duration::hours(1);

    let report = validate_batch(&incidents);
    let codes: BTreeSet<&str> = report
        .iter()
        .flat_map(|item| item.warnings.iter().map(|w| w.code.as_str()))
        .collect();
    assert!(codes.contains("VALIDATION_NUMBER_DUPLICATE"));
    assert!(codes.contains("VALIDATION_TS_ORDER_VIOLATION"));
    assert_eq!(report.len(), 3);
}
