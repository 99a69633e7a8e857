use super::*;
use crate::types::{ChartQuery, MissingValuePolicy};
use pretty_assertions::assert_eq;
use serde_json::json;

fn records(value: serde_json::Value) -> Vec<Record> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

fn query(group_by: &str, value: &str, label: Option<&str>) -> ChartQuery {
    ChartQuery::new(group_by, value, label)
}

#[test]
fn test_join_uses_secondary_label() {
    let primary = records(json!([
        {"orgId": 1, "appName": "alpha"},
        {"orgId": 1, "appName": "beta"},
    ]));
    let secondary = records(json!([{"orgId": 1, "orgName": "Acme"}]));

    let result = aggregate(
        &primary,
        &secondary,
        &query("orgId", "1", Some("orgName")),
        MissingValuePolicy::CountAsOne,
    );

    assert_eq!(result.entries(), &[("Acme".to_string(), 2.0)]);
}

#[test]
fn test_unmatched_key_falls_back_to_raw_key() {
    let primary = records(json!([{"orgId": 7}]));
    let secondary = records(json!([{"orgId": 1, "orgName": "Acme"}]));

    let result = aggregate(
        &primary,
        &secondary,
        &query("orgId", "1", Some("orgName")),
        MissingValuePolicy::CountAsOne,
    );

    assert_eq!(result.entries(), &[("7".to_string(), 1.0)]);
}

#[test]
fn test_absent_key_falls_back_to_unknown() {
    let primary = records(json!([{"name": "orphan"}, {"orgId": null}, {"orgId": 0}]));

    let result = aggregate(
        &primary,
        &[],
        &query("orgId", "1", None),
        MissingValuePolicy::CountAsOne,
    );

    // Absent, null, and zero-valued keys are all falsy
    assert_eq!(result.entries(), &[(UNKNOWN_GROUP.to_string(), 3.0)]);
}

#[test]
fn test_reference_scenario() {
    // primary = [{orgId:1},{orgId:1},{orgId:2}], secondary = [{orgId:1,orgName:"Acme"}]
    // with an everywhere-absent value field => {"Acme": 2, "2": 1}
    let primary = records(json!([{"orgId": 1}, {"orgId": 1}, {"orgId": 2}]));
    let secondary = records(json!([{"orgId": 1, "orgName": "Acme"}]));

    let result = aggregate(
        &primary,
        &secondary,
        &query("orgId", "missing", Some("orgName")),
        MissingValuePolicy::CountAsOne,
    );

    assert_eq!(
        result.entries(),
        &[("Acme".to_string(), 2.0), ("2".to_string(), 1.0)]
    );
}

#[test]
fn test_accumulation_sums_truthy_values_and_counts_falsy_as_one() {
    let primary = records(json!([
        {"appId": "a", "seats": 3},
        {"appId": "a", "seats": 2.5},
        {"appId": "a"},
        {"appId": "a", "seats": 0},
    ]));

    let result = aggregate(
        &primary,
        &[],
        &query("appId", "seats", None),
        MissingValuePolicy::CountAsOne,
    );

    // 3 + 2.5 + 1 (absent) + 1 (zero is falsy)
    assert_eq!(result.entries(), &[("a".to_string(), 7.5)]);
    assert_eq!(result.total(), 7.5);
}

#[test]
fn test_missing_value_policy_zero_and_skip() {
    let primary = records(json!([
        {"appId": "a", "seats": 4},
        {"appId": "a"},
        {"appId": "b"},
    ]));

    let zero = aggregate(
        &primary,
        &[],
        &query("appId", "seats", None),
        MissingValuePolicy::CountAsZero,
    );
    assert_eq!(
        zero.entries(),
        &[("a".to_string(), 4.0), ("b".to_string(), 0.0)]
    );

    let skip = aggregate(
        &primary,
        &[],
        &query("appId", "seats", None),
        MissingValuePolicy::Skip,
    );
    // The measureless records contribute nothing; "b" never becomes a bucket
    assert_eq!(skip.entries(), &[("a".to_string(), 4.0)]);
}

#[test]
fn test_numeric_string_measures_parse() {
    let primary = records(json!([{"appId": "a", "seats": "12"}]));

    let result = aggregate(
        &primary,
        &[],
        &query("appId", "seats", None),
        MissingValuePolicy::CountAsOne,
    );

    assert_eq!(result.entries(), &[("a".to_string(), 12.0)]);
}

#[test]
fn test_lookup_collisions_keep_last_label() {
    let secondary = records(json!([
        {"orgId": 1, "orgName": "First"},
        {"orgId": 1, "orgName": "Second"},
    ]));

    let lookup = build_label_lookup(&secondary, "orgId", Some("orgName"));
    assert_eq!(lookup.get("1"), Some(&"Second".to_string()));
}

#[test]
fn test_lookup_empty_without_label_field() {
    let secondary = records(json!([{"orgId": 1, "orgName": "Acme"}]));
    assert!(build_label_lookup(&secondary, "orgId", None).is_empty());
}

#[test]
fn test_entries_follow_first_encounter_order() {
    let primary = records(json!([
        {"orgId": "zebra"},
        {"orgId": "apple"},
        {"orgId": "zebra"},
        {"orgId": "mango"},
    ]));

    let result = aggregate(
        &primary,
        &[],
        &query("orgId", "1", None),
        MissingValuePolicy::CountAsOne,
    );

    let labels: Vec<&str> = result.labels().collect();
    assert_eq!(labels, vec!["zebra", "apple", "mango"]);
}

#[test]
fn test_empty_primary_yields_empty_aggregation() {
    let result = aggregate(
        &[],
        &[],
        &query("orgId", "1", None),
        MissingValuePolicy::CountAsOne,
    );
    assert!(result.is_empty());
    assert_eq!(result.total(), 0.0);
}
