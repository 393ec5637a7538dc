use std::fs;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;
use time::macros::{date, datetime};
use time::Date;

use itsm_core::analytics::{build_dashboard, DASHBOARD_PAYLOAD_VERSION};
use itsm_core::chart::ChartUnit;
use itsm_core::config::{AllFilterScope, DashboardConfig, OpenedAtPolicy};
use itsm_core::demo::generate_incidents;
use itsm_core::error::codes;
use itsm_core::filter::DateWindow;
use itsm_core::metrics::SummaryCard;
use itsm_core::view::ViewState;

#[test]
fn dashboard_reconciles_cards_charts_and_table() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let cfg = DashboardConfig {
        all_filter_scope: AllFilterScope::Unrestricted,
        ..DashboardConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(2024);
    let incidents = generate_incidents(100, now, &cfg, &mut rng);

    let view = ViewState::new(&cfg);
    let dash = build_dashboard(&incidents, &view, &cfg, now).expect("dash");

    assert_eq!(dash.version, DASHBOARD_PAYLOAD_VERSION);
    assert_eq!(dash.prompt, None);
    assert_eq!(dash.incident_count, 100);
    assert_eq!(dash.filtered_count, 100);

    // Status cards are Total plus five states; Unassigned lives in the summary metrics.
    assert_eq!(dash.status_cards[0].count, 100);
    let state_total: i64 = dash.state_counts.iter().map(|c| c.count).sum();
    assert_eq!(state_total, 100);
    let sla_total: i64 = dash.sla_counts.iter().map(|c| c.count).sum();
    assert_eq!(sla_total, 100);

    // Daily trend is continuous from the oldest incident to today.
    let trend_total: i64 = dash
        .sla_trend
        .datasets
        .iter()
        .flat_map(|d| d.data.iter())
        .sum();
    assert_eq!(trend_total, 100);
    assert_eq!(dash.sla_trend.labels.last().map(String::as_str), Some("2024-11-14"));

    assert_eq!(dash.category_state_chart.unit, ChartUnit::Percent);
    assert_eq!(dash.category_state_chart.labels.len(), 6);
    for group in &dash.category_state_percentages {
        let sum: i64 = group.percents.iter().map(|p| p.percent).sum();
        assert_eq!(sum, if group.total > 0 { 100 } else { 0 });
    }
    assert_eq!(dash.priority_state.groups.len(), 5);

    assert_eq!(dash.table.total_rows, 100);
    assert_eq!(dash.table.rows.len(), cfg.default_page_size);
    assert_eq!(dash.table.rows[0].number, "INC0000001");
}

#[test]
fn incomplete_custom_range_renders_empty_with_prompt() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let cfg = DashboardConfig::default();
    let mut rng = StdRng::seed_from_u64(5);
    let incidents = generate_incidents(40, now, &cfg, &mut rng);

    let view = ViewState::new(&cfg).with_window(DateWindow::Custom {
        from: Some(date!(2024 - 11 - 01)),
        to: None,
    });
    let dash = build_dashboard(&incidents, &view, &cfg, now).expect("not fatal");

    let prompt = dash.prompt.expect("prompt");
    assert_eq!(prompt.code, codes::FILTER_CUSTOM_RANGE_INCOMPLETE);
    assert_eq!(dash.window_label, "Please select a date range");
    assert_eq!(dash.filtered_count, 0);
    assert!(dash.table.rows.is_empty());
    assert!(dash
        .category_state_percentages
        .iter()
        .all(|g| g.percents.iter().all(|p| p.percent == 0)));
    // Summary cards ignore the window.
    assert_eq!(dash.incident_count, 40);
}

#[test]
fn custom_window_trend_covers_every_selected_day() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let cfg = DashboardConfig::default();
    let mut rng = StdRng::seed_from_u64(9);
    let incidents = generate_incidents(60, now, &cfg, &mut rng);

    let view = ViewState::new(&cfg)
        .apply_custom_range(Some(date!(2024 - 11 - 01)), Some(date!(2024 - 11 - 10)))
        .expect("range");
    let dash = build_dashboard(&incidents, &view, &cfg, now).expect("dash");

    assert_eq!(dash.sla_trend.labels.len(), 10);
    assert_eq!(dash.sla_trend.labels[0], "2024-11-01");
    assert_eq!(dash.window_label, "01 Nov 2024 - 10 Nov 2024");
}

#[test]
fn custom_range_ending_on_the_last_representable_day_renders() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let cfg = DashboardConfig::default();

    let view = ViewState::new(&cfg)
        .apply_custom_range(Some(date!(9999 - 12 - 30)), Some(Date::MAX))
        .expect("range");
    let dash = build_dashboard(&[], &view, &cfg, now).expect("dash");

    assert_eq!(dash.prompt, None);
    assert_eq!(dash.sla_trend.labels, vec!["9999-12-30", "9999-12-31"]);
    assert_eq!(dash.window_label, "30 Dec 9999 - 31 Dec 9999");
}

#[test]
fn windows_wider_than_the_trend_cap_keep_only_populated_days() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let cfg = DashboardConfig::default();
    let mut rng = StdRng::seed_from_u64(31);
    let incidents = generate_incidents(50, now, &cfg, &mut rng);

    let view = ViewState::new(&cfg)
        .apply_custom_range(Some(date!(0001 - 01 - 01)), Some(Date::MAX))
        .expect("range");
    let dash = build_dashboard(&incidents, &view, &cfg, now).expect("dash");

    assert_eq!(dash.filtered_count, 50);
    assert!(dash.sla_trend.labels.len() <= 61);
    let trend_total: i64 = dash
        .sla_trend
        .datasets
        .iter()
        .flat_map(|d| d.data.iter())
        .sum();
    assert_eq!(trend_total, 50);

    let capped = DashboardConfig {
        max_trend_days: 3,
        ..DashboardConfig::default()
    };
    let view = ViewState::new(&capped)
        .apply_custom_range(Some(date!(2024 - 11 - 01)), Some(date!(2024 - 11 - 10)))
        .expect("range");
    let sparse = build_dashboard(&[], &view, &capped, now).expect("dash");
    assert!(sparse.sla_trend.labels.is_empty());
}

#[test]
fn summary_card_selection_drives_the_table() {
    let now = datetime!(2024-11-14 12:00 UTC);
    let cfg = DashboardConfig::default();
    let mut rng = StdRng::seed_from_u64(77);
    let incidents = generate_incidents(100, now, &cfg, &mut rng);

    let view = ViewState::new(&cfg)
        .with_window(DateWindow::Today)
        .with_card(Some(SummaryCard::Overdue));
    let dash = build_dashboard(&incidents, &view, &cfg, now).expect("dash");

    assert_eq!(dash.table.total_rows as i64, dash.summary.overdue);
}

#[test]
fn config_loads_from_json_file_with_defaults() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("dashboard.json");
    fs::write(
        &path,
        r#"{
            "all_filter_scope": "unrestricted",
            "opened_at_policy": "same_as_created",
            "stale_days": 5
        }"#,
    )
    .unwrap();

    let cfg = DashboardConfig::load(&path).expect("load");
    assert_eq!(cfg.all_filter_scope, AllFilterScope::Unrestricted);
    assert_eq!(cfg.opened_at_policy, OpenedAtPolicy::SameAsCreated);
    assert_eq!(cfg.stale_days, 5);
    assert_eq!(cfg.overdue_days, 30);
    assert_eq!(cfg.page_size_options, vec![5, 10, 15]);
}

#[test]
fn config_errors_are_structured() {
    let missing = DashboardConfig::load(std::path::Path::new("/nonexistent/dashboard.json"))
        .expect_err("missing file");
    assert_eq!(missing.code, codes::CONFIG_READ_FAILED);

    let garbled = DashboardConfig::from_json_str("{ not json").expect_err("garbled");
    assert_eq!(garbled.code, codes::CONFIG_PARSE_FAILED);

    let invalid = DashboardConfig::from_json_str(r#"{ "default_page_size": 12 }"#)
        .expect_err("invalid");
    assert_eq!(invalid.code, codes::CONFIG_INVALID);

    let no_trend = DashboardConfig::from_json_str(r#"{ "max_trend_days": 0 }"#)
        .expect_err("zero trend cap");
    assert_eq!(no_trend.code, codes::CONFIG_INVALID);
}
