//! Property-based tests for batching and reconciliation.
//!
//! These tests verify that the coverage and ordering guarantees hold across
//! arbitrary vendor feeds and catalogs, using `proptest` for generation.

use proptest::prelude::*;
use std::collections::HashSet;
use stocksync_core::{
    batches, reconcile_prices, reconcile_stocks, OfferIdSet, RawValue, StockUpdate, VendorRecord,
};

// =============================================================================
// Generators
// =============================================================================

/// Offer ids come from a small alphabet so vendor codes collide with them often.
fn arb_offer_id() -> impl Strategy<Value = String> {
    "[A-F][0-9]{1,2}"
}

/// Generates a quantity cell that always normalizes successfully.
fn arb_quantity() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        Just(RawValue::from(">10")),
        Just(RawValue::from("1")),
        (0u32..500).prop_map(|n| RawValue::from(n.to_string())),
        (0i64..500).prop_map(RawValue::Integer),
        (0u32..500).prop_map(|n| RawValue::Float(f64::from(n))),
    ]
}

/// Generates a price cell in the vendor's "5'990.00 руб." format.
fn arb_price() -> impl Strategy<Value = RawValue> {
    (1u32..100, 0u32..1000).prop_map(|(thousands, units)| {
        RawValue::from(format!("{}'{:03}.00 руб.", thousands, units))
    })
}

fn arb_vendor_record() -> impl Strategy<Value = VendorRecord> {
    (arb_offer_id(), arb_quantity(), arb_price()).prop_map(|(code, quantity, price)| {
        VendorRecord {
            code: RawValue::from(code),
            quantity,
            price,
        }
    })
}

fn arb_vendor_records(max_count: usize) -> impl Strategy<Value = Vec<VendorRecord>> {
    proptest::collection::vec(arb_vendor_record(), 0..=max_count)
}

fn arb_offer_ids(max_count: usize) -> impl Strategy<Value = OfferIdSet> {
    proptest::collection::vec(arb_offer_id(), 0..=max_count)
        .prop_map(|ids| ids.into_iter().collect())
}

fn as_set(updates: &[StockUpdate]) -> HashSet<(String, u32)> {
    updates
        .iter()
        .map(|u| (u.offer_id.clone(), u.quantity))
        .collect()
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Concatenating the chunks reproduces the input, and only the last chunk
    /// may be short.
    #[test]
    fn prop_batches_reassemble_input(
        items in proptest::collection::vec(any::<u16>(), 0..300),
        size in 1usize..50,
    ) {
        let chunks: Vec<&[u16]> = batches(&items, size).unwrap().collect();

        let rebuilt: Vec<u16> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        prop_assert_eq!(&rebuilt, &items);

        if let Some((last, full)) = chunks.split_last() {
            prop_assert!(full.iter().all(|c| c.len() == size));
            prop_assert!(!last.is_empty() && last.len() <= size);
        }
    }

    /// A zero batch size is always rejected.
    #[test]
    fn prop_batches_zero_size_fails(items in proptest::collection::vec(any::<u8>(), 0..20)) {
        prop_assert!(batches(&items, 0).is_err());
    }

    /// Every listed offer gets exactly one stock update, and nothing else does.
    #[test]
    fn prop_stock_updates_cover_offer_ids_exactly(
        records in arb_vendor_records(40),
        offer_ids in arb_offer_ids(30),
    ) {
        let updates = reconcile_stocks(&records, &offer_ids, None, None).unwrap();

        prop_assert_eq!(updates.len(), offer_ids.len());
        let produced: HashSet<&str> = updates.iter().map(|u| u.offer_id.as_str()).collect();
        let expected: HashSet<&str> = offer_ids.iter().map(String::as_str).collect();
        prop_assert_eq!(produced, expected);
    }

    /// Running reconciliation twice on the same inputs yields the same updates.
    #[test]
    fn prop_stock_reconciliation_is_idempotent(
        records in arb_vendor_records(40),
        offer_ids in arb_offer_ids(30),
    ) {
        let first = reconcile_stocks(&records, &offer_ids, Some("W1"), None).unwrap();
        let second = reconcile_stocks(&records, &offer_ids, Some("W1"), None).unwrap();

        prop_assert_eq!(as_set(&first), as_set(&second));
        prop_assert_eq!(first, second);
    }

    /// Price updates only reference listed offers, at most once each.
    #[test]
    fn prop_price_updates_are_subset_of_offer_ids(
        records in arb_vendor_records(40),
        offer_ids in arb_offer_ids(30),
    ) {
        let updates = reconcile_prices(&records, &offer_ids, "RUB").unwrap();

        let mut seen = HashSet::new();
        for update in &updates {
            prop_assert!(offer_ids.contains(&update.offer_id));
            prop_assert!(seen.insert(update.offer_id.clone()));
        }
    }
}

#[test]
fn end_to_end_scenario_matches_then_zeroes() {
    let records = vec![
        VendorRecord::new("A", ">10", ""),
        VendorRecord::new("B", "1", ""),
    ];
    let offer_ids: OfferIdSet = ["A", "B", "C"].into_iter().collect();

    let updates = reconcile_stocks(&records, &offer_ids, None, None).unwrap();

    let pairs: Vec<(&str, u32)> = updates
        .iter()
        .map(|u| (u.offer_id.as_str(), u.quantity))
        .collect();
    assert_eq!(pairs, vec![("A", 100), ("B", 0), ("C", 0)]);
}
