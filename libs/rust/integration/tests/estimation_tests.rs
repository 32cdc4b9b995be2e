//! Total estimation against the in-memory log store.

use securelog_client::TotalEstimator;
use securelog_integration_tests::{init_test_tracing, mock_view};
use securelog_test_utils::{CountMode, MockLogStore};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn estimator(store: &Arc<MockLogStore>) -> Arc<TotalEstimator<MockLogStore>> {
    Arc::new(TotalEstimator::new(
        Arc::clone(store),
        25,
        200,
        CancellationToken::new(),
    ))
}

#[tokio::test]
async fn test_authoritative_count_skips_scan() {
    init_test_tracing();
    let store = Arc::new(MockLogStore::new(400).with_count_mode(CountMode::Fixed(17)));

    let estimate = estimator(&store).estimate_total().await;

    assert_eq!(estimate.value, Some(17));
    assert_eq!(store.count_calls(), 1);
    assert_eq!(store.fetch_count(), 0);
}

#[tokio::test]
async fn test_missing_count_endpoint_scans_53_entries_in_three_pages() {
    let store = Arc::new(MockLogStore::new(53).with_count_mode(CountMode::Unavailable));

    let estimate = estimator(&store).estimate_total().await;

    assert_eq!(estimate.value, Some(53));
    assert!(!estimate.capped);
    assert_eq!(store.requests().await, vec![(25, 0), (25, 25), (25, 50)]);
}

#[tokio::test]
async fn test_failing_count_endpoint_falls_back_silently() {
    let store = Arc::new(MockLogStore::new(7).with_count_mode(CountMode::Failing));

    let estimate = estimator(&store).estimate_total().await;

    assert_eq!(estimate.value, Some(7));
    assert_eq!(store.fetch_count(), 1);
}

#[tokio::test]
async fn test_scan_failure_is_unknown() {
    let store = Arc::new(MockLogStore::new(53).with_count_mode(CountMode::Unavailable));
    let estimator = estimator(&store);
    assert_eq!(estimator.estimate_total().await.value, Some(53));

    store.set_failing(true);
    let estimate = estimator.estimate_total().await;

    assert_eq!(estimate.value, None);
    assert_eq!(estimate.label(), "unknown");
}

#[tokio::test]
async fn test_empty_store_counts_zero() {
    let store = Arc::new(MockLogStore::new(0).with_count_mode(CountMode::Unavailable));
    assert_eq!(estimator(&store).estimate_total().await.value, Some(0));
}

#[tokio::test]
async fn test_cancel_mid_scan_leaves_value_unchanged() {
    let store = Arc::new(MockLogStore::new(53));
    let estimator = estimator(&store);
    assert_eq!(estimator.estimate_total().await.value, Some(53));

    store.append(20).await;
    store.set_count_mode(CountMode::Unavailable).await;
    store.gate_after(1).await;

    let run = {
        let estimator = Arc::clone(&estimator);
        tokio::spawn(async move { estimator.estimate_total().await })
    };
    store.wait_until_gated().await;
    assert!(estimator.estimate().await.computing);

    estimator.cancel().await;
    let returned = tokio::time::timeout(Duration::from_secs(1), run)
        .await
        .expect("cancelled scan must stop without waiting for the gate")
        .unwrap();

    assert_eq!(returned.value, Some(53));
    let current = estimator.estimate().await;
    assert_eq!(current.value, Some(53));
    assert!(!current.computing);
    assert_eq!(store.fetch_count(), 2);
    assert_eq!(store.waiting(), 0);
}

#[tokio::test]
async fn test_superseded_run_cannot_overwrite_newer_result() {
    let store = Arc::new(MockLogStore::new(53).with_count_mode(CountMode::Unavailable));
    let estimator = estimator(&store);
    store.gate_after(1).await;

    let stale = {
        let estimator = Arc::clone(&estimator);
        tokio::spawn(async move { estimator.estimate_total().await })
    };
    store.wait_until_gated().await;

    store.set_count_mode(CountMode::Fixed(99)).await;
    let fresh = estimator.estimate_total().await;
    assert_eq!(fresh.value, Some(99));

    store.release();
    stale.await.unwrap();

    let current = estimator.estimate().await;
    assert_eq!(current.value, Some(99));
    assert!(!current.computing);
}

#[tokio::test]
async fn test_closing_view_stops_scan() {
    let store = Arc::new(MockLogStore::new(500).with_count_mode(CountMode::Unavailable));
    let view = Arc::new(mock_view(&store).unwrap());
    store.gate_after(2).await;

    let run = {
        let view = Arc::clone(&view);
        tokio::spawn(async move { view.refresh_total().await })
    };
    store.wait_until_gated().await;
    view.close().await;

    let estimate = tokio::time::timeout(Duration::from_secs(1), run)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(estimate.value, None);
    assert_eq!(store.fetch_count(), 3);

    let snapshot = view.snapshot().await;
    assert!(snapshot.closed);
    assert!(!snapshot.total.computing);
}

#[tokio::test]
async fn test_scan_cap_marks_lower_bound() {
    let store = Arc::new(MockLogStore::new(5_100).with_count_mode(CountMode::Unavailable));

    let estimate = estimator(&store).estimate_total().await;

    assert_eq!(estimate.value, Some(5_000));
    assert!(estimate.capped);
    assert_eq!(estimate.label(), "5000+");
    assert_eq!(store.fetch_count(), 200);
}
