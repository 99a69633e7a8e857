use super::*;
use crate::types::Record;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::future::Ready;
use std::time::Duration;

fn records(value: serde_json::Value) -> Vec<Record> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

#[tokio::test]
async fn test_fetch_pair_returns_both_collections() {
    let primary = records(json!([{"orgId": 1}]));
    let secondary = records(json!([{"orgId": 1, "orgName": "Acme"}]));

    let (p, s) = fetch_pair(
        std::future::ready(Ok(primary.clone())),
        Some(std::future::ready(Ok(secondary.clone()))),
    )
    .await
    .unwrap();

    assert_eq!(p, primary);
    assert_eq!(s, secondary);
}

#[tokio::test]
async fn test_missing_secondary_defaults_to_empty() {
    let primary = records(json!([{"orgId": 1}]));

    let (p, s) = fetch_pair(
        std::future::ready(Ok(primary.clone())),
        None::<Ready<anyhow::Result<Vec<Record>>>>,
    )
    .await
    .unwrap();

    assert_eq!(p, primary);
    assert!(s.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_sources_are_dispatched_concurrently() {
    // A 50ms primary joined with a 10ms secondary must finish in 50ms of
    // (paused, auto-advanced) time, not 60ms. A sequential implementation
    // would advance the clock by the sum.
    let start = tokio::time::Instant::now();

    let primary = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(records(json!([{"orgId": 1}])))
    };
    let secondary = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(records(json!([{"orgId": 1, "orgName": "Acme"}])))
    };

    fetch_pair(primary, Some(secondary)).await.unwrap();

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(55),
        "expected concurrent dispatch, wall time was {elapsed:?}"
    );
}

#[tokio::test]
async fn test_primary_failure_discards_secondary_success() {
    let secondary = records(json!([{"orgId": 1, "orgName": "Acme"}]));

    let result = fetch_pair(
        std::future::ready(Err(anyhow::anyhow!("connection refused"))),
        Some(std::future::ready(Ok(secondary))),
    )
    .await;

    let err = result.unwrap_err();
    // A single undifferentiated error, whichever source failed
    assert_eq!(err.to_string(), "error fetching data");
}

#[tokio::test]
async fn test_secondary_failure_fails_the_cycle() {
    let primary = records(json!([{"orgId": 1}]));

    let result = fetch_pair(
        std::future::ready(Ok(primary)),
        Some(std::future::ready(Err(anyhow::anyhow!("500")))),
    )
    .await;

    assert!(result.is_err());
}

#[test]
fn test_generation_tickets_invalidate_older_cycles() {
    let generation = FetchGeneration::new();

    let first = generation.next();
    assert!(generation.is_current(first));

    let second = generation.next();
    assert!(!generation.is_current(first));
    assert!(generation.is_current(second));
}
