//! Property-based tests across the SecureLog client.
//!
//! These tests verify universal properties across all inputs using proptest.

use proptest::prelude::*;
use securelog_client::normalize::{RawResponse, normalize};
use securelog_client::{ClientConfig, LogView, Navigation, RequestOutcome, TotalEstimator};
use securelog_test_utils::{
    CountMode, MockLogStore, error_body_strategy, log_entry_strategy, operation_strategy,
    page_size_strategy, store_size_strategy, success_body_strategy,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn last_page(len: usize, page_size: usize) -> usize {
    len.saturating_sub(1) / page_size
}

// **Property 1: Speculative Navigation Stops At The Last Non-Empty Page**
// *For any* stored entries, page size and number of forward steps, the page index
// SHALL equal min(steps, last non-empty page) and the displayed page SHALL be
// non-empty whenever the store is non-empty.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_next_never_shows_empty_page(
        entries in proptest::collection::vec(log_entry_strategy(), 0..120),
        page_size in page_size_strategy(),
        steps in 0usize..15,
    ) {
        let len = entries.len();
        let (index, shown, moved) = tokio_test::block_on(async {
            let store = Arc::new(MockLogStore::with_entries(entries));
            let config = ClientConfig::new("http://localhost:8000").unwrap().with_page_size(page_size);
            let view = LogView::new(store, &config);
            view.refresh_page().await.unwrap();

            let mut moved = 0;
            for _ in 0..steps {
                if view.next_page().await.unwrap() == Navigation::Moved {
                    moved += 1;
                }
            }
            let page = view.snapshot().await.page;
            (page.page_index, page.entries.len(), moved)
        });

        prop_assert_eq!(index, steps.min(last_page(len, page_size)));
        prop_assert_eq!(moved, index);
        if len > 0 {
            prop_assert!(shown > 0);
        }
        prop_assert!(shown <= page_size);
    }
}

// **Property 2: Estimation Is Exact And Idempotent On A Static Store**
// *For any* store below the scan ceiling, the fallback scan SHALL report the
// exact size using floor(len / page_size) + 1 fetches, and a second run SHALL
// report the same value.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_scan_counts_exactly(
        len in store_size_strategy(),
        page_size in page_size_strategy(),
    ) {
        let (first, second, fetches) = tokio_test::block_on(async {
            let store = Arc::new(MockLogStore::new(len).with_count_mode(CountMode::Unavailable));
            let estimator = TotalEstimator::new(Arc::clone(&store), page_size, 10_000, CancellationToken::new());
            let first = estimator.estimate_total().await;
            let fetches = store.fetch_count();
            let second = estimator.estimate_total().await;
            (first, second, fetches)
        });

        prop_assert_eq!(first.value, Some(len as u64));
        prop_assert!(!first.capped);
        prop_assert_eq!(first, second);
        prop_assert_eq!(fetches, len / page_size + 1);
    }
}

// **Property 3: Success Field Precedence**
// *For any* success body carrying `data` and/or the operation's legacy field,
// the outcome SHALL be a success with the `data` value when present.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_success_precedence(
        (operation, (body, expected)) in operation_strategy()
            .prop_flat_map(|op| (Just(op), success_body_strategy(op))),
    ) {
        let raw = RawResponse::new(200, body.to_string());
        prop_assert_eq!(normalize(operation, &raw), RequestOutcome::success(expected));
    }

    #[test]
    fn prop_error_precedence(
        operation in operation_strategy(),
        (body, expected) in error_body_strategy(),
        status in prop_oneof![400u16..=499, 500u16..=599],
    ) {
        let raw = RawResponse::new(status, body.to_string());
        prop_assert_eq!(normalize(operation, &raw), RequestOutcome::failure(expected));
    }
}
