use reststats::aggregate::aggregate;
use reststats::app::{App, Report};
use reststats::fetch::{fetch_pair, FetchGeneration, RestClient};
use reststats::plotting::{render_chart, ChartRenderer, PlottersRenderer, RenderBackend};
use reststats::types::{ChartKind, MissingValuePolicy, Record};
use serde_json::json;

fn records(value: serde_json::Value) -> Vec<Record> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

fn org_collection() -> Vec<Record> {
    records(json!([
        {"orgId": 1, "orgName": "Acme"},
        {"orgId": 2, "orgName": "Globex"},
    ]))
}

fn app_collection() -> Vec<Record> {
    records(json!([
        {"appId": 10, "appName": "Portal", "orgId": 1},
        {"appId": 11, "appName": "Billing", "orgId": 1},
        {"appId": 12, "appName": "Support", "orgId": 2},
        {"appId": 13, "appName": "Legacy", "orgId": 99},
    ]))
}

#[tokio::test]
async fn test_full_workflow() {
    let mut app = App::default();
    assert!(app.aggregation.is_none());

    // Fetch both collections concurrently from in-memory sources
    let (primary, secondary) = fetch_pair(
        std::future::ready(Ok(app_collection())),
        Some(std::future::ready(Ok(org_collection()))),
    )
    .await
    .unwrap();

    let report = Report::ApplicationsPerOrganization;
    let aggregation = aggregate(
        &primary,
        &secondary,
        &report.query(),
        MissingValuePolicy::CountAsOne,
    );

    // Two labeled organizations plus the unmatched raw key
    let labels: Vec<&str> = aggregation.labels().collect();
    assert_eq!(labels, vec!["Acme", "Globex", "99"]);
    assert_eq!(aggregation.total(), 4.0);

    app.update_with_aggregation(aggregation.clone());
    assert!(app.update_needed);
    assert!(app.error_message.is_none());

    // The aggregation is cached for the current selection
    assert_eq!(app.get_cached_aggregation(), Some(aggregation.clone()));

    // Both backends render every chart kind from the same aggregation
    for backend in RenderBackend::ALL {
        for kind in ChartKind::ALL {
            let rendered = render_chart(backend, &aggregation, kind, report.title()).unwrap();
            assert!(!rendered.png.is_empty());
        }
    }
}

#[tokio::test]
async fn test_fetch_failure_suppresses_chart() {
    let mut app = App::default();

    // Seed a previous successful render
    let aggregation = aggregate(
        &app_collection(),
        &org_collection(),
        &Report::ApplicationsPerOrganization.query(),
        MissingValuePolicy::CountAsOne,
    );
    app.update_with_aggregation(aggregation.clone());
    app.rendered = Some(
        PlottersRenderer::default()
            .render(&aggregation, ChartKind::Bar, "Report")
            .unwrap(),
    );

    // Primary rejects even though secondary would have succeeded
    let outcome = fetch_pair(
        std::future::ready(Err(anyhow::anyhow!("backend down"))),
        Some(std::future::ready(Ok(org_collection()))),
    )
    .await;
    assert!(outcome.is_err());

    app.set_fetch_error();
    assert_eq!(app.error_message.as_deref(), Some("Error fetching data."));
    // No chart survives a failed cycle
    assert!(app.rendered.is_none());
    assert!(app.aggregation.is_none());
}

#[tokio::test]
async fn test_stale_fetch_cycle_is_dropped() {
    let mut app = App::default();
    let generation = app.generation.clone();

    let first_ticket = generation.next();
    // A selector change dispatches a newer cycle before the first settles
    let second_ticket = generation.next();

    let stale = aggregate(
        &records(json!([{"orgId": 1}])),
        &[],
        &Report::ApplicationsPerOrganization.query(),
        MissingValuePolicy::CountAsOne,
    );
    let fresh = aggregate(
        &app_collection(),
        &org_collection(),
        &Report::ApplicationsPerOrganization.query(),
        MissingValuePolicy::CountAsOne,
    );

    // Responses arrive out of order: the stale one first
    if generation.is_current(first_ticket) {
        app.update_with_aggregation(stale);
    }
    assert!(app.aggregation.is_none());

    if generation.is_current(second_ticket) {
        app.update_with_aggregation(fresh.clone());
    }
    assert_eq!(app.aggregation, Some(fresh));
}

#[tokio::test]
async fn test_unreachable_backend_reports_single_error() {
    // Nothing listens on this port; both requests fail fast
    let client = RestClient::new("http://127.0.0.1:1");

    let outcome = fetch_pair(
        client.fetch_records("app"),
        Some(client.fetch_records("org")),
    )
    .await;

    let err = outcome.unwrap_err();
    assert_eq!(err.to_string(), "error fetching data");
}

#[test]
fn test_report_presets_match_console_endpoints() {
    let report = Report::ApplicationsPerOrganization;
    assert_eq!(report.primary_path(), "app");
    assert_eq!(report.secondary_path(), "org");
    assert_eq!(report.query().group_by_field, "orgId");
    assert_eq!(report.query().label_field.as_deref(), Some("orgName"));

    let report = Report::UsersPerApplication;
    assert_eq!(report.primary_path(), "users");
    assert_eq!(report.secondary_path(), "app");
    assert_eq!(report.query().group_by_field, "appId");
    assert_eq!(report.query().label_field.as_deref(), Some("appName"));
}

#[test]
fn test_generation_sequencing() {
    let generation = FetchGeneration::new();
    let tickets: Vec<u64> = (0..3).map(|_| generation.next()).collect();
    assert_eq!(tickets, vec![1, 2, 3]);
    assert!(generation.is_current(3));
}
